use crate::harness::condition::Condition;
use crate::harness::env::EnvSource;
use crate::harness::source::{Arguments, ResourceLoader, Source};
use crate::utils::error::{ContactError, Result};
use std::fmt;

pub const DEFAULT_REPETITION_NAME: &str = "repetition {currentRepetition} of {totalRepetitions}";
pub const DEFAULT_PARAMETERIZED_NAME: &str = "[{index}] {arguments}";

/// Why a case body stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt {
    /// An assertion did not hold.
    Failed(String),
    /// An assumption did not hold; the case is reported as aborted, not failed.
    Aborted(String),
}

impl From<ContactError> for Interrupt {
    fn from(err: ContactError) -> Self {
        Interrupt::Failed(err.to_string())
    }
}

pub type CaseResult = std::result::Result<(), Interrupt>;

pub fn assume_true(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(Interrupt::Aborted(message.into()))
    }
}

pub fn check(condition: bool, message: impl Into<String>) -> CaseResult {
    if condition {
        Ok(())
    } else {
        Err(Interrupt::Failed(message.into()))
    }
}

pub fn check_eq<T: PartialEq + fmt::Debug>(expected: T, actual: T, context: &str) -> CaseResult {
    if expected == actual {
        Ok(())
    } else {
        Err(Interrupt::Failed(format!(
            "{}: expected {:?}, got {:?}",
            context, expected, actual
        )))
    }
}

/// Passes only when `result` is an error.
pub fn check_err<T, E: fmt::Display>(
    result: std::result::Result<T, E>,
    message: impl Into<String>,
) -> CaseResult {
    match result {
        Err(e) => {
            tracing::debug!("Expected failure observed: {}", e);
            Ok(())
        }
        Ok(_) => Err(Interrupt::Failed(message.into())),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepetitionInfo {
    pub current: usize,
    pub total: usize,
}

/// What a case body sees for one invocation.
pub struct Invocation<'a> {
    pub label: String,
    pub arguments: Arguments,
    pub repetition: Option<RepetitionInfo>,
    env: &'a dyn EnvSource,
}

impl<'a> Invocation<'a> {
    pub(crate) fn new(planned: PlannedInvocation, env: &'a dyn EnvSource) -> Self {
        Self {
            label: planned.label,
            arguments: planned.arguments,
            repetition: planned.repetition,
            env,
        }
    }

    pub fn env_var(&self, key: &str) -> Option<String> {
        self.env.var(key)
    }

    pub fn argument(&self, index: usize) -> std::result::Result<&str, Interrupt> {
        self.arguments.get(index).ok_or_else(|| {
            Interrupt::Failed(format!(
                "missing argument {} (got {} arguments)",
                index,
                self.arguments.len()
            ))
        })
    }
}

pub(crate) struct PlannedInvocation {
    pub label: String,
    pub arguments: Arguments,
    pub repetition: Option<RepetitionInfo>,
}

#[derive(Debug)]
pub enum CaseKind {
    Single,
    Repeated { total: usize, name_template: String },
    Parameterized { source: Source, name_template: String },
}

type Body<F> = Box<dyn Fn(&mut F, &Invocation<'_>) -> CaseResult>;

/// One declared test: a body plus how and when it is invoked.
pub struct Case<F> {
    name: String,
    display_name: Option<String>,
    condition: Option<Condition>,
    kind: CaseKind,
    pub(crate) body: Body<F>,
}

impl<F> Case<F> {
    fn with_kind<B>(name: impl Into<String>, kind: CaseKind, body: B) -> Self
    where
        B: Fn(&mut F, &Invocation<'_>) -> CaseResult + 'static,
    {
        Self {
            name: name.into(),
            display_name: None,
            condition: None,
            kind,
            body: Box::new(body),
        }
    }

    pub fn test<B>(name: impl Into<String>, body: B) -> Self
    where
        B: Fn(&mut F, &Invocation<'_>) -> CaseResult + 'static,
    {
        Self::with_kind(name, CaseKind::Single, body)
    }

    pub fn repeated<B>(name: impl Into<String>, total: usize, body: B) -> Self
    where
        B: Fn(&mut F, &Invocation<'_>) -> CaseResult + 'static,
    {
        let kind = CaseKind::Repeated {
            total,
            name_template: DEFAULT_REPETITION_NAME.to_string(),
        };
        Self::with_kind(name, kind, body)
    }

    pub fn parameterized<B>(name: impl Into<String>, source: Source, body: B) -> Self
    where
        B: Fn(&mut F, &Invocation<'_>) -> CaseResult + 'static,
    {
        let kind = CaseKind::Parameterized {
            source,
            name_template: DEFAULT_PARAMETERIZED_NAME.to_string(),
        };
        Self::with_kind(name, kind, body)
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Overrides the per-invocation label of a repeated or parameterized case.
    pub fn name_template(mut self, template: impl Into<String>) -> Self {
        match &mut self.kind {
            CaseKind::Repeated { name_template, .. }
            | CaseKind::Parameterized { name_template, .. } => *name_template = template.into(),
            CaseKind::Single => {
                tracing::warn!("Ignoring name template on single case {}", self.name)
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn kind(&self) -> &CaseKind {
        &self.kind
    }

    pub(crate) fn skip_reason(&self, host: crate::harness::condition::HostOs) -> Option<String> {
        self.condition.as_ref().and_then(|c| c.evaluate(host))
    }

    pub(crate) fn matches_filter(&self, filter: &str) -> bool {
        self.name.contains(filter) || self.label().contains(filter)
    }

    pub(crate) fn plan(&self, loader: &ResourceLoader) -> Result<Vec<PlannedInvocation>> {
        let planned = match &self.kind {
            CaseKind::Single => vec![PlannedInvocation {
                label: self.label().to_string(),
                arguments: Arguments::default(),
                repetition: None,
            }],
            CaseKind::Repeated {
                total,
                name_template,
            } => (1..=*total)
                .map(|current| PlannedInvocation {
                    label: name_template
                        .replace("{displayName}", self.label())
                        .replace("{currentRepetition}", &current.to_string())
                        .replace("{totalRepetitions}", &total.to_string()),
                    arguments: Arguments::default(),
                    repetition: Some(RepetitionInfo {
                        current,
                        total: *total,
                    }),
                })
                .collect(),
            CaseKind::Parameterized {
                source,
                name_template,
            } => source
                .rows(loader)?
                .into_iter()
                .enumerate()
                .map(|(i, arguments)| PlannedInvocation {
                    label: name_template
                        .replace("{displayName}", self.label())
                        .replace("{index}", &(i + 1).to_string())
                        .replace("{arguments}", &arguments.to_string()),
                    arguments,
                    repetition: None,
                })
                .collect(),
        };
        Ok(planned)
    }
}
