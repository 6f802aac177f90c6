use crate::command::{CommandOutput, CommandSpec};
use crate::error::ProcessError;
use crate::runner::CommandRunner;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug)]
struct Rule {
    prefix: String,
    replies: VecDeque<CommandOutput>,
}

/// Recording [`CommandRunner`] fake.
///
/// Replies are matched by command-line prefix; the first matching rule wins.
/// Each rule hands out its replies in order and keeps repeating the last one.
/// Commands without a matching rule succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the replies for commands starting with `prefix`.
    #[must_use]
    pub fn on(self, prefix: impl Into<String>, replies: impl IntoIterator<Item = CommandOutput>) -> Self {
        self.rules
            .borrow_mut()
            .push(Rule { prefix: prefix.into(), replies: replies.into_iter().collect() });
        self
    }

    /// Every command line seen so far, in order.
    #[must_use]
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(CommandSpec::command_line).collect()
    }

    /// Every invocation seen so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Number of recorded command lines starting with `prefix`.
    #[must_use]
    pub fn count(&self, prefix: &str) -> usize {
        self.command_lines().iter().filter(|line| line.starts_with(prefix)).count()
    }

    fn reply(&self, spec: &CommandSpec) -> CommandOutput {
        self.calls.borrow_mut().push(spec.clone());

        let line = spec.command_line();
        let mut rules = self.rules.borrow_mut();
        let Some(rule) = rules.iter_mut().find(|rule| line.starts_with(&rule.prefix)) else {
            return CommandOutput::ok("");
        };

        if rule.replies.len() > 1 {
            rule.replies.pop_front().unwrap_or_default()
        } else {
            rule.replies.front().cloned().unwrap_or_else(|| CommandOutput::ok(""))
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn output(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        Ok(self.reply(spec))
    }

    fn stream(&self, spec: &CommandSpec) -> Result<CommandOutput, ProcessError> {
        let CommandOutput { code, .. } = self.reply(spec);
        Ok(CommandOutput { code, ..CommandOutput::default() })
    }
}
