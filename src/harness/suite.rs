use crate::harness::case::Case;

/// How fixture instances are shared inside a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lifecycle {
    /// One instance for every case of the group and its all-hooks.
    PerClass,
    /// A fresh `F::default()` for every invocation.
    #[default]
    PerMethod,
}

pub(crate) type Hook<F> = Box<dyn Fn(&mut F)>;

/// A named group of cases with its own hooks and nested groups.
///
/// `before_each`/`after_each` hooks of enclosing groups wrap every case of a
/// nested group: outer before, inner before, body, inner after, outer after.
pub struct Group<F> {
    name: String,
    display_name: Option<String>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) before_all: Vec<Hook<F>>,
    pub(crate) before_each: Vec<Hook<F>>,
    pub(crate) after_each: Vec<Hook<F>>,
    pub(crate) after_all: Vec<Hook<F>>,
    pub(crate) cases: Vec<Case<F>>,
    pub(crate) groups: Vec<Group<F>>,
}

impl<F> Group<F> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            lifecycle: Lifecycle::default(),
            before_all: Vec::new(),
            before_each: Vec::new(),
            after_each: Vec::new(),
            after_all: Vec::new(),
            cases: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn before_all(mut self, hook: impl Fn(&mut F) + 'static) -> Self {
        self.before_all.push(Box::new(hook));
        self
    }

    pub fn before_each(mut self, hook: impl Fn(&mut F) + 'static) -> Self {
        self.before_each.push(Box::new(hook));
        self
    }

    pub fn after_each(mut self, hook: impl Fn(&mut F) + 'static) -> Self {
        self.after_each.push(Box::new(hook));
        self
    }

    pub fn after_all(mut self, hook: impl Fn(&mut F) + 'static) -> Self {
        self.after_all.push(Box::new(hook));
        self
    }

    pub fn case(mut self, case: Case<F>) -> Self {
        self.cases.push(case);
        self
    }

    pub fn group(mut self, group: Group<F>) -> Self {
        self.groups.push(group);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn cases(&self) -> &[Case<F>] {
        &self.cases
    }

    pub fn groups(&self) -> &[Group<F>] {
        &self.groups
    }

    /// Number of declared cases in this group and all nested groups.
    pub fn case_count(&self) -> usize {
        self.cases.len() + self.groups.iter().map(Group::case_count).sum::<usize>()
    }

    pub(crate) fn has_selected(&self, filter: Option<&str>) -> bool {
        match filter {
            None => true,
            Some(filter) => {
                self.cases.iter().any(|c| c.matches_filter(filter))
                    || self.groups.iter().any(|g| g.has_selected(Some(filter)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::case::Case;

    #[test]
    fn test_group_builder_counts_nested_cases() {
        let group: Group<()> = Group::new("Outer")
            .lifecycle(Lifecycle::PerClass)
            .case(Case::test("a", |_, _| Ok(())))
            .group(
                Group::new("Inner")
                    .case(Case::test("b", |_, _| Ok(())))
                    .case(Case::test("c", |_, _| Ok(()))),
            );

        assert_eq!(group.case_count(), 3);
        assert_eq!(group.lifecycle, Lifecycle::PerClass);
        assert_eq!(group.groups()[0].lifecycle, Lifecycle::PerMethod);
        assert!(group.has_selected(Some("c")));
        assert!(!group.has_selected(Some("zzz")));
    }
}
