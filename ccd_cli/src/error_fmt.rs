//! Human-readable error descriptions and structured JSON error formatting.

use ccd_core::protocol::describe_reply;
use ccd_core::{SettingsError, TimingError};

fn describe_timing(te: &TimingError) -> String {
    match te {
        TimingError::CommandFailed { opcode, reply } => format!(
            "What happened: The timing board rejected {opcode} (reply {}).\nLikely causes: Argument out of the board's range, or the board is busy with a readout.\nHow to fix: Check the value in the config, stop any running exposure, then retry.",
            describe_reply(*reply)
        ),
        TimingError::DependencyAborted { opcode, source } => format!(
            "What happened: {opcode} was not sent because a prerequisite command failed.\nCause: {source}\nHow to fix: Fix the prerequisite (gain/speed for the integration time) and retry; the integration time is unchanged."
        ),
        TimingError::Timeout { opcode } => format!(
            "What happened: No reply to {opcode} from the timing board.\nLikely causes: Board powered down, fiber link unplugged, or the controller hung.\nHow to fix: Check power and the link, then run `ccdtiming self-check`."
        ),
        TimingError::Channel { opcode, message } => format!(
            "What happened: The command channel failed while sending {opcode} ({message}).\nLikely causes: Wrong [board] target or a driver fault.\nHow to fix: Verify board.target in the config (2 = timing board) and the interface driver."
        ),
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(te) = err.downcast_ref::<TimingError>() {
        return describe_timing(te);
    }

    if let Some(se) = err.downcast_ref::<SettingsError>() {
        return format!(
            "What happened: Invalid timing setting ({se}).\nLikely causes: Typo in the config or on the command line.\nHow to fix: Use a gain of 1, 2, 5 or 10 and non-negative durations in microseconds."
        );
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("read config") {
        return format!(
            "What happened: Could not read the config file.\nLikely causes: Wrong --config path or missing permissions.\nHow to fix: Pass an existing file with --config. Original: {msg}"
        );
    }

    if lower.starts_with("parse config") || lower.contains("timing.") || lower.contains("logging.")
    {
        return format!(
            "What happened: Configuration is invalid or incomplete.\nLikely causes: Missing [timing] keys or out-of-range values.\nHow to fix: Edit the TOML config and try again. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 rejected, 4 aborted prerequisite, 5 channel/timeout, 1 otherwise.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<TimingError>() {
        Some(TimingError::CommandFailed { .. }) => 3,
        Some(TimingError::DependencyAborted { .. }) => 4,
        Some(TimingError::Channel { .. } | TimingError::Timeout { .. }) => 5,
        None => 1,
    }
}

pub fn reason_name(err: &eyre::Report) -> &'static str {
    match err.downcast_ref::<TimingError>() {
        Some(TimingError::CommandFailed { .. }) => "CommandFailed",
        Some(TimingError::DependencyAborted { .. }) => "DependencyAborted",
        Some(TimingError::Channel { .. }) => "Channel",
        Some(TimingError::Timeout { .. }) => "Timeout",
        None if err.downcast_ref::<SettingsError>().is_some() => "InvalidSetting",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let msg = humanize(err);
    if let Some(te) = err.downcast_ref::<TimingError>() {
        let mut obj = json!({
            "reason": reason_name(err),
            "opcode": te.opcode().mnemonic(),
            "message": msg,
        });
        if let Some(reply) = te.reply() {
            obj["reply"] = json!(format!("{reply:#010x}"));
        }
        return obj.to_string();
    }

    json!({ "reason": reason_name(err), "message": msg }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccd_core::Opcode;
    use ccd_hardware::error::HwError;

    const ERR: u32 = 0x0045_5252;

    #[test]
    fn exit_codes_follow_error_kind() {
        let failed = eyre::Report::new(TimingError::CommandFailed {
            opcode: Opcode::Dgw,
            reply: ERR,
        });
        assert_eq!(exit_code_for_error(&failed), 3);

        let aborted = eyre::Report::new(TimingError::DependencyAborted {
            opcode: Opcode::Cit,
            source: Box::new(TimingError::Timeout { opcode: Opcode::Sgn }),
        });
        assert_eq!(exit_code_for_error(&aborted), 4);

        let timeout = eyre::Report::new(TimingError::Timeout { opcode: Opcode::Ogw });
        assert_eq!(exit_code_for_error(&timeout), 5);

        assert_eq!(exit_code_for_error(&eyre::eyre!("read config: nope")), 1);
        assert_eq!(exit_code_for_error(&eyre::Report::new(HwError::Timeout)), 1);
    }

    #[test]
    fn json_error_carries_opcode_and_reply() {
        let aborted = eyre::Report::new(TimingError::DependencyAborted {
            opcode: Opcode::Cit,
            source: Box::new(TimingError::CommandFailed {
                opcode: Opcode::Sgn,
                reply: ERR,
            }),
        });
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&aborted)).unwrap();
        assert_eq!(v["reason"], "DependencyAborted");
        assert_eq!(v["opcode"], "CIT");
        assert_eq!(v["reply"], "0x00455252");
    }

    #[test]
    fn humanize_names_the_reply() {
        let failed = eyre::Report::new(TimingError::CommandFailed {
            opcode: Opcode::Sww,
            reply: ERR,
        });
        let text = humanize(&failed);
        assert!(text.contains("rejected SWW"), "{text}");
        assert!(text.contains("0x00455252 (ERR)"), "{text}");
    }
}
