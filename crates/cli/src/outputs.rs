//! Step outputs
//!
//! The result is reported as `key=value` lines on stdout and, when running
//! under GitHub Actions, appended to the file named by `GITHUB_OUTPUT`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use jenkins_trigger_domain::BuildOutcome;

pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

pub fn render(outcome: &BuildOutcome) -> String {
    format!("build_result={}\nbuild_url={}\n", outcome.result, outcome.build_url)
}

/// Write the outputs to `stdout` and, if given, append them to `output_file`.
pub fn emit(
    outcome: &BuildOutcome,
    stdout: &mut impl Write,
    output_file: Option<&Path>,
) -> anyhow::Result<()> {
    let rendered = render(outcome);

    stdout.write_all(rendered.as_bytes()).context("failed to write outputs to stdout")?;
    stdout.flush().context("failed to flush stdout")?;

    if let Some(path) = output_file {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.write_all(rendered.as_bytes())
            .with_context(|| format!("failed to append outputs to {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use jenkins_trigger_domain::BuildResult;
    use tempfile::NamedTempFile;

    use super::*;

    fn outcome(result: BuildResult) -> BuildOutcome {
        BuildOutcome {
            result,
            build_url: "https://ci.example.com/job/deploy/5/".into(),
            number: Some(5),
        }
    }

    #[test]
    fn test_render_uses_wire_names() {
        assert_eq!(
            render(&outcome(BuildResult::NotBuilt)),
            "build_result=NOT_BUILT\nbuild_url=https://ci.example.com/job/deploy/5/\n"
        );
    }

    #[test]
    fn test_emit_appends_to_output_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "previous=step\n").unwrap();
        let mut stdout = Vec::new();

        emit(&outcome(BuildResult::Success), &mut stdout, Some(file.path())).unwrap();

        let expected = "build_result=SUCCESS\nbuild_url=https://ci.example.com/job/deploy/5/\n";
        assert_eq!(String::from_utf8(stdout).unwrap(), expected);
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            format!("previous=step\n{expected}")
        );
    }

    #[test]
    fn test_emit_without_output_file_only_prints() {
        let mut stdout = Vec::new();
        emit(&outcome(BuildResult::Failure), &mut stdout, None).unwrap();
        assert!(String::from_utf8(stdout).unwrap().starts_with("build_result=FAILURE\n"));
    }
}
