//! Fatal error rendering at the top-level boundary

use indirector::IndirectorError;

use crate::ui::blocks::error::ErrorBlock;
use crate::ui::terminal::detect_capabilities;

fn error_block(err: &IndirectorError) -> ErrorBlock {
    match err {
        IndirectorError::Environment { reason } => ErrorBlock::new("Environment check failed")
            .with_detail("Reason", reason)
            .with_fix("Run on a Debian or Ubuntu host as a user with sudo rights"),
        IndirectorError::CommandFailed {
            step,
            command,
            code,
            stderr,
        } => ErrorBlock::new(format!("{} failed", step))
            .with_detail("Command", command)
            .with_detail("Exit code", code.to_string())
            .with_output(stderr),
        IndirectorError::Spawn { command, source } => ErrorBlock::new("Could not start command")
            .with_detail("Command", command)
            .with_detail("Reason", source.to_string()),
        IndirectorError::ComposeFileMissing { dir } => ErrorBlock::new(err.to_string())
            .with_detail("Directory", dir.display().to_string())
            .with_fix("Pass --project-dir pointing at the stack checkout, or set bootstrap.compose_file"),
        IndirectorError::InvalidConfig { file, message } => ErrorBlock::new("Invalid configuration")
            .with_detail("File", file.display().to_string())
            .with_output(message),
        other => ErrorBlock::new(other.to_string()),
    }
}

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    match err.downcast_ref::<IndirectorError>() {
        Some(known) => error_block(known).render(supports_color, supports_unicode),
        None => {
            let mut block = ErrorBlock::new(err.to_string());
            for cause in err.chain().skip(1) {
                block = block.with_detail("Caused by", cause.to_string());
            }
            block.render(supports_color, supports_unicode)
        }
    }
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let mut event = serde_json::json!({
            "event": "error",
            "message": err.to_string(),
        });
        if let Some(IndirectorError::CommandFailed { step, command, code, .. }) =
            err.downcast_ref::<IndirectorError>()
        {
            event["step"] = step.as_str().into();
            event["command"] = command.as_str().into();
            event["code"] = (*code).into();
        }
        let _ = crate::ui::json::emit(&event);
        return;
    }

    let caps = detect_capabilities();
    eprint!("{}", format_error(err, caps.supports_color, caps.supports_unicode));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failure_shows_step_command_and_code() {
        let err = anyhow::Error::new(IndirectorError::CommandFailed {
            step: "Deploy".into(),
            command: "docker compose pull".into(),
            code: 18,
            stderr: "pull access denied\n".into(),
        });
        let rendered = format_error(&err, false, false);
        assert!(rendered.contains("Deploy failed"));
        assert!(rendered.contains("Command: docker compose pull"));
        assert!(rendered.contains("Exit code: 18"));
        assert!(rendered.contains("pull access denied"));
    }

    #[test]
    fn foreign_errors_list_their_causes() {
        let err = anyhow::anyhow!("disk full").context("writing snippets");
        let rendered = format_error(&err, false, true);
        assert!(rendered.contains("writing snippets"));
        assert!(rendered.contains("Caused by: disk full"));
    }
}
