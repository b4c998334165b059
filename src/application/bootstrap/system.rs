//! Package index refresh and system upgrade

use crate::domain::ports::{BootstrapEvent, BootstrapEventSink, CommandRunner, Invocation};
use crate::error::IndirectorResult;

pub const STEP: &str = "System update";

pub fn update_system(runner: &impl CommandRunner, sink: &impl BootstrapEventSink) -> IndirectorResult<()> {
    sink.on_event(BootstrapEvent::StepStarted {
        step: STEP.to_string(),
    });

    for invocation in [
        Invocation::new("apt-get").arg("update").privileged(),
        Invocation::new("apt-get").args(["upgrade", "-y"]).privileged(),
    ] {
        sink.on_event(BootstrapEvent::CommandStarted {
            command: invocation.to_string(),
        });
        runner.run_checked(STEP, &invocation)?;
    }

    Ok(())
}
