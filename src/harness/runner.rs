use crate::config::SuiteConfig;
use crate::harness::case::{Case, Interrupt, Invocation};
use crate::harness::condition::HostOs;
use crate::harness::env::{EnvSource, LayeredEnv, MapEnv, ProcessEnv};
use crate::harness::source::ResourceLoader;
use crate::harness::suite::{Group, Hook, Lifecycle};
use crate::utils::error::Result;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Outcome {
    Passed,
    Failed { message: String },
    Skipped { reason: String },
    Aborted { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    /// Labels of the enclosing groups, outermost first.
    pub path: Vec<String>,
    pub case: String,
    pub label: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn aborted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Aborted { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn find(&self, label: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// All invocations of the case with the given method name.
    pub fn entries_for(&self, case: &str) -> Vec<&ReportEntry> {
        self.entries.iter().filter(|e| e.case == case).collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.entries.iter().filter(|e| predicate(&e.outcome)).count()
    }

    fn record(&mut self, path: &[String], case: &str, label: String, outcome: Outcome) {
        match &outcome {
            Outcome::Passed => tracing::info!("✅ {}", label),
            Outcome::Failed { message } => tracing::error!("❌ {}: {}", label, message),
            Outcome::Skipped { reason } => tracing::warn!("⏭️ {} skipped: {}", label, reason),
            Outcome::Aborted { reason } => tracing::warn!("⚠️ {} aborted: {}", label, reason),
        }
        self.entries.push(ReportEntry {
            path: path.to_vec(),
            case: case.to_string(),
            label,
            outcome,
        });
    }
}

/// Executes a group tree sequentially and collects a report.
pub struct Runner {
    host_os: HostOs,
    env: Box<dyn EnvSource>,
    loader: ResourceLoader,
    filter: Option<String>,
}

impl Runner {
    pub fn new(host_os: HostOs, env: impl EnvSource + 'static, loader: ResourceLoader) -> Self {
        Self {
            host_os,
            env: Box::new(env),
            loader,
            filter: None,
        }
    }

    pub fn from_config(config: &SuiteConfig) -> Result<Self> {
        let host_os = config.host_os()?;
        let overrides = MapEnv::from(config.environment.clone());
        let loader = ResourceLoader::new(&config.runner.resource_root);

        let mut runner = Self::new(host_os, LayeredEnv::new(overrides, ProcessEnv), loader);
        runner.filter = config.runner.filter.clone();
        Ok(runner)
    }

    /// Only cases whose method or display name contains `filter` run.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn host_os(&self) -> HostOs {
        self.host_os
    }

    pub fn run<F: Default>(&self, group: &Group<F>) -> Report {
        tracing::info!("🚀 Running {} on {}", group.label(), self.host_os);
        let mut report = Report::default();
        let mut chain = Vec::new();
        self.run_group(group, &mut chain, &mut report);
        tracing::info!(
            "📊 {} passed, {} failed, {} skipped, {} aborted",
            report.passed(),
            report.failed(),
            report.skipped(),
            report.aborted()
        );
        report
    }

    fn run_group<'g, F: Default>(
        &self,
        group: &'g Group<F>,
        chain: &mut Vec<&'g Group<F>>,
        report: &mut Report,
    ) {
        if !group.has_selected(self.filter.as_deref()) {
            return;
        }

        chain.push(group);
        let path: Vec<String> = chain.iter().map(|g| g.label().to_string()).collect();
        let mut class_instance = F::default();

        if let Err(message) = run_hooks(&group.before_all, &mut class_instance) {
            // 群組初始化失敗時，所有案例（含巢狀群組）都記為失敗
            let message = format!("before_all hook failed: {}", message);
            self.fail_group(group, &path, &message, report);
        } else {
            for case in self.selected_cases(group) {
                self.run_case(case, chain, &path, &mut class_instance, group.lifecycle, report);
            }
            for nested in &group.groups {
                self.run_group(nested, chain, report);
            }
        }

        if let Err(message) = run_hooks(&group.after_all, &mut class_instance) {
            tracing::error!("after_all hook of {} failed: {}", group.label(), message);
        }
        chain.pop();
    }

    fn fail_group<F>(&self, group: &Group<F>, path: &[String], message: &str, report: &mut Report) {
        for case in self.selected_cases(group) {
            report.record(
                path,
                case.name(),
                case.label().to_string(),
                Outcome::Failed {
                    message: message.to_string(),
                },
            );
        }
        for nested in &group.groups {
            if nested.has_selected(self.filter.as_deref()) {
                let mut nested_path = path.to_vec();
                nested_path.push(nested.label().to_string());
                self.fail_group(nested, &nested_path, message, report);
            }
        }
    }

    fn selected_cases<'g, F>(&self, group: &'g Group<F>) -> impl Iterator<Item = &'g Case<F>> + 'g {
        let filter = self.filter.clone();
        group
            .cases
            .iter()
            .filter(move |c| filter.as_deref().map_or(true, |f| c.matches_filter(f)))
    }

    fn run_case<F: Default>(
        &self,
        case: &Case<F>,
        chain: &[&Group<F>],
        path: &[String],
        class_instance: &mut F,
        lifecycle: Lifecycle,
        report: &mut Report,
    ) {
        if let Some(reason) = case.skip_reason(self.host_os) {
            report.record(path, case.name(), case.label().to_string(), Outcome::Skipped { reason });
            return;
        }

        let planned = match case.plan(&self.loader) {
            Ok(planned) => planned,
            Err(e) => {
                report.record(
                    path,
                    case.name(),
                    case.label().to_string(),
                    Outcome::Failed {
                        message: format!("Failed to resolve arguments: {}", e),
                    },
                );
                return;
            }
        };

        for planned in planned {
            let invocation = Invocation::new(planned, self.env.as_ref());
            let mut fresh = None;
            let fixture: &mut F = match lifecycle {
                Lifecycle::PerClass => &mut *class_instance,
                Lifecycle::PerMethod => fresh.insert(F::default()),
            };
            let outcome = invoke(case, chain, fixture, &invocation);
            report.record(path, case.name(), invocation.label, outcome);
        }
    }
}

fn invoke<F>(case: &Case<F>, chain: &[&Group<F>], fixture: &mut F, invocation: &Invocation<'_>) -> Outcome {
    let body = panic::catch_unwind(AssertUnwindSafe(|| {
        for group in chain {
            for hook in &group.before_each {
                hook(&mut *fixture);
            }
        }
        (case.body)(&mut *fixture, invocation)
    }));

    let teardown = panic::catch_unwind(AssertUnwindSafe(|| {
        for group in chain.iter().rev() {
            for hook in &group.after_each {
                hook(&mut *fixture);
            }
        }
    }));

    let outcome = match body {
        Ok(Ok(())) => Outcome::Passed,
        Ok(Err(Interrupt::Failed(message))) => Outcome::Failed { message },
        Ok(Err(Interrupt::Aborted(reason))) => Outcome::Aborted { reason },
        Err(payload) => Outcome::Failed {
            message: panic_message(payload.as_ref()),
        },
    };

    match teardown {
        Err(payload) if !matches!(outcome, Outcome::Failed { .. }) => Outcome::Failed {
            message: format!("after_each hook failed: {}", panic_message(payload.as_ref())),
        },
        _ => outcome,
    }
}

fn run_hooks<F>(hooks: &[Hook<F>], fixture: &mut F) -> std::result::Result<(), String> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        for hook in hooks {
            hook(&mut *fixture);
        }
    }))
    .map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::case::{check, Case};
    use crate::harness::condition::Condition;
    use crate::harness::source::Source;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Counter {
        hits: usize,
    }

    fn runner(host: HostOs) -> Runner {
        Runner::new(host, MapEnv::new(), ResourceLoader::crate_resources())
    }

    #[test]
    fn test_per_class_shares_fixture_per_method_does_not() {
        let counting = |c: &mut Counter, _: &Invocation<'_>| {
            c.hits += 1;
            check(c.hits <= 2, "unexpected hits")
        };
        let shared: Group<Counter> = Group::new("shared")
            .lifecycle(Lifecycle::PerClass)
            .case(Case::repeated("count", 3, move |c: &mut Counter, i: &Invocation<'_>| {
                counting(c, i)
            }));
        let fresh: Group<Counter> = Group::new("fresh")
            .case(Case::repeated("count", 3, move |c: &mut Counter, i: &Invocation<'_>| {
                counting(c, i)
            }));

        let shared_report = runner(HostOs::Linux).run(&shared);
        assert_eq!(shared_report.passed(), 2);
        assert_eq!(shared_report.failed(), 1);

        let fresh_report = runner(HostOs::Linux).run(&fresh);
        assert_eq!(fresh_report.passed(), 3);
    }

    #[test]
    fn test_hook_order_for_nested_group() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let push = |tag: &'static str| {
            let log = Rc::clone(&log);
            move |_: &mut Counter| log.borrow_mut().push(tag)
        };
        let body_log = Rc::clone(&log);

        let group: Group<Counter> = Group::new("outer")
            .before_all(push("outer-before-all"))
            .before_each(push("outer-before-each"))
            .after_each(push("outer-after-each"))
            .after_all(push("outer-after-all"))
            .group(
                Group::new("inner")
                    .before_all(push("inner-before-all"))
                    .before_each(push("inner-before-each"))
                    .after_each(push("inner-after-each"))
                    .after_all(push("inner-after-all"))
                    .case(Case::test("body", move |_, _| {
                        body_log.borrow_mut().push("body");
                        Ok(())
                    })),
            );

        let report = runner(HostOs::Linux).run(&group);
        assert!(report.is_success());
        assert_eq!(
            *log.borrow(),
            vec![
                "outer-before-all",
                "inner-before-all",
                "outer-before-each",
                "inner-before-each",
                "body",
                "inner-after-each",
                "outer-after-each",
                "inner-after-all",
                "outer-after-all",
            ]
        );
        assert_eq!(report.entries()[0].path, vec!["outer", "inner"]);
    }

    #[test]
    fn test_panics_and_interrupts_map_to_outcomes() {
        let group: Group<Counter> = Group::new("outcomes")
            .case(Case::test("panics", |_, _| panic!("boom")))
            .case(Case::test("aborts", |_, _| Err(Interrupt::Aborted("nope".into()))))
            .case(Case::test("skipped", |_, _| Ok(())).condition(Condition::disabled("off")));

        let report = runner(HostOs::Linux).run(&group);
        assert_eq!(
            report.find("panics").map(|e| &e.outcome),
            Some(&Outcome::Failed { message: "boom".into() })
        );
        assert_eq!(report.aborted(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_before_all_panic_fails_all_cases_including_nested() {
        let group: Group<Counter> = Group::new("outer")
            .before_all(|_| panic!("setup broke"))
            .case(Case::test("direct", |_, _| Ok(())))
            .group(
                Group::new("inner")
                    .case(Case::test("nested", |_, _| Ok(())))
                    .group(Group::new("deepest").case(Case::repeated("deep", 2, |_, _| Ok(())))),
            );

        let report = runner(HostOs::Linux).run(&group);
        assert_eq!(report.total(), 3);
        assert_eq!(report.failed(), 3);
        assert!(!report.is_success());

        let nested = report.find("nested").expect("nested case reported");
        assert_eq!(nested.path, vec!["outer", "inner"]);
        assert!(matches!(
            &nested.outcome,
            Outcome::Failed { message } if message == "before_all hook failed: setup broke"
        ));
        assert_eq!(report.entries_for("deep")[0].path, vec!["outer", "inner", "deepest"]);
    }

    #[test]
    fn test_before_all_panic_in_nested_only_group_is_not_success() {
        let group: Group<Counter> = Group::new("outer")
            .before_all(|_| panic!("setup broke"))
            .group(Group::new("inner").case(Case::test("nested", |_, _| Ok(()))));

        let report = runner(HostOs::Linux).run(&group);
        assert_eq!(report.failed(), 1);
        assert!(!report.is_success());
    }

    #[test]
    fn test_after_each_panic_fails_passing_invocation() {
        let group: Group<Counter> = Group::new("teardown")
            .after_each(|_| panic!("cleanup broke"))
            .case(Case::test("passes", |_, _| Ok(())))
            .case(Case::test("fails", |_, _| Err(Interrupt::Failed("own failure".into()))))
            .case(Case::test("aborts", |_, _| Err(Interrupt::Aborted("assumption".into()))));

        let report = runner(HostOs::Linux).run(&group);
        assert_eq!(
            report.find("passes").map(|e| &e.outcome),
            Some(&Outcome::Failed {
                message: "after_each hook failed: cleanup broke".into()
            })
        );
        assert_eq!(
            report.find("fails").map(|e| &e.outcome),
            Some(&Outcome::Failed {
                message: "own failure".into()
            })
        );
        assert!(matches!(
            report.find("aborts").map(|e| &e.outcome),
            Some(Outcome::Failed { message }) if message.starts_with("after_each hook failed")
        ));
        assert_eq!(report.failed(), 3);
    }

    #[test]
    fn test_unresolvable_source_reports_single_failure() {
        let group: Group<Counter> = Group::new("sources").case(Case::parameterized(
            "missing",
            Source::csv_file("/nope.csv"),
            |_, _| Ok(()),
        ));

        let report = runner(HostOs::Linux).run(&group);
        assert_eq!(report.total(), 1);
        assert!(matches!(
            &report.entries()[0].outcome,
            Outcome::Failed { message } if message.contains("/nope.csv")
        ));
    }

    #[test]
    fn test_filter_limits_reported_cases() {
        let group: Group<Counter> = Group::new("filtered")
            .case(Case::test("alpha", |_, _| Ok(())))
            .case(Case::test("beta", |_, _| Ok(())));

        let report = runner(HostOs::Linux).with_filter("bet").run(&group);
        assert_eq!(report.total(), 1);
        assert_eq!(report.entries()[0].case, "beta");
    }

    #[test]
    fn test_report_json_export() {
        let group: Group<Counter> = Group::new("json").case(Case::test("ok", |_, _| Ok(())));
        let json = runner(HostOs::Linux).run(&group).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entries"][0]["outcome"]["status"], "passed");
        assert_eq!(value["entries"][0]["label"], "ok");
    }
}
