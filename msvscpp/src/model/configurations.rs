use std::collections::BTreeMap;

use super::configuration::{self, Configuration, X64};

/// Configurations keyed by `name|platform`.
///
/// Besides the mapping it remembers configuration names and platforms in
/// the order they were first seen, each without duplicates. These are used
/// to produce stable emitting order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configurations<C> {
    configurations: BTreeMap<String, C>,
    names: Vec<String>,
    platforms: Vec<String>,
}

impl<C> Default for Configurations<C> {
    fn default() -> Self {
        Self {
            configurations: BTreeMap::new(),
            names: Vec::new(),
            platforms: Vec::new(),
        }
    }
}

impl<C: Configuration> Configurations<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds configuration. Configuration with the same identifier is replaced.
    pub fn append(&mut self, configuration: C) {
        if !self.names.iter().any(|n| n == configuration.name()) {
            self.names.push(configuration.name().to_owned());
        }
        if !self.platforms.iter().any(|p| p == configuration.platform()) {
            self.platforms.push(configuration.platform().to_owned());
        }
        self.configurations
            .insert(configuration.identifier(), configuration);
    }

    #[must_use]
    pub fn get_by_identifier(&self, name: &str, platform: &str) -> Option<&C> {
        self.configurations
            .get(&configuration::identifier(name, platform))
    }

    pub fn get_by_identifier_mut(&mut self, name: &str, platform: &str) -> Option<&mut C> {
        self.configurations
            .get_mut(&configuration::identifier(name, platform))
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.configurations.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.configurations.values_mut()
    }

    /// Configurations ordered by name (descending when `reverse`) then by
    /// platform ascending.
    #[must_use]
    pub fn get_sorted(&self, reverse: bool) -> Vec<&C> {
        let mut names: Vec<&String> = self.names.iter().collect();
        names.sort();
        if reverse {
            names.reverse();
        }
        let mut platforms: Vec<&String> = self.platforms.iter().collect();
        platforms.sort();

        names
            .into_iter()
            .flat_map(|name| {
                platforms
                    .iter()
                    .filter_map(move |platform| self.get_by_identifier(name, platform))
            })
            .collect()
    }

    /// Adds an x64 copy of every configuration that has none yet.
    /// Existing configurations are left as they are.
    pub fn extend_with_x64(&mut self) {
        let copies: Vec<C> = self
            .configurations
            .values()
            .filter(|c| c.platform() != X64)
            .filter(|c| self.get_by_identifier(c.name(), X64).is_none())
            .map(Configuration::copy_to_x64)
            .collect();

        for copy in copies {
            self.append(copy);
        }
    }
}

impl<C: Configuration> FromIterator<C> for Configurations<C> {
    fn from_iter<T: IntoIterator<Item = C>>(iter: T) -> Self {
        let mut configurations = Self::new();
        for configuration in iter {
            configurations.append(configuration);
        }
        configurations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::configuration::{DEBUG, RELEASE, WIN32};
    use crate::model::{ProjectConfiguration, SolutionConfiguration};
    use proptest::prelude::*;
    use rstest::rstest;

    fn matrix() -> Configurations<SolutionConfiguration> {
        [
            SolutionConfiguration::new(RELEASE, WIN32),
            SolutionConfiguration::new(DEBUG, WIN32),
            SolutionConfiguration::new(RELEASE, X64),
            SolutionConfiguration::new(DEBUG, X64),
        ]
        .into_iter()
        .collect()
    }

    fn identifiers(sorted: Vec<&SolutionConfiguration>) -> Vec<String> {
        sorted.into_iter().map(Configuration::identifier).collect()
    }

    #[rstest]
    #[case(false, vec!["Release|Win32", "Release|x64", "VSDebug|Win32", "VSDebug|x64"])]
    #[case(true, vec!["VSDebug|Win32", "VSDebug|x64", "Release|Win32", "Release|x64"])]
    #[trace]
    fn get_sorted_tests(#[case] reverse: bool, #[case] expected: Vec<&str>) {
        // Arrange
        let configurations = matrix();

        // Act
        let actual = identifiers(configurations.get_sorted(reverse));

        // Assert
        assert_eq!(actual, expected);
    }

    #[test]
    fn get_sorted_is_repeatable() {
        // Arrange
        let configurations = matrix();

        // Act
        let first = identifiers(configurations.get_sorted(true));
        let second = identifiers(configurations.get_sorted(true));

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn append_same_identifier_replaces() {
        // Arrange
        let mut configurations = Configurations::new();
        let mut first = ProjectConfiguration::new(RELEASE, WIN32);
        first.output_type = "1".to_owned();
        let mut second = ProjectConfiguration::new(RELEASE, WIN32);
        second.output_type = "4".to_owned();

        // Act
        configurations.append(first);
        configurations.append(second.clone());

        // Assert
        assert_eq!(1, configurations.len());
        assert_eq!(
            Some(&second),
            configurations.get_by_identifier(RELEASE, WIN32)
        );
        assert_eq!(vec![RELEASE.to_owned()], configurations.names());
        assert_eq!(vec![WIN32.to_owned()], configurations.platforms());
    }

    #[test]
    fn extend_with_x64_keeps_existing_x64_entry() {
        // Arrange
        let mut configurations = Configurations::new();
        let mut existing = ProjectConfiguration::new(RELEASE, X64);
        existing.output_type = "2".to_owned();
        configurations.append(existing.clone());
        configurations.append(ProjectConfiguration::new(RELEASE, WIN32));
        configurations.append(ProjectConfiguration::new(DEBUG, WIN32));

        // Act
        configurations.extend_with_x64();

        // Assert
        assert_eq!(4, configurations.len());
        assert_eq!(Some(&existing), configurations.get_by_identifier(RELEASE, X64));
        assert!(configurations.get_by_identifier(DEBUG, X64).is_some());
        assert_eq!(
            Some(WIN32),
            configurations
                .get_by_identifier(DEBUG, WIN32)
                .map(Configuration::platform)
        );
    }

    fn configuration_strategy() -> impl Strategy<Value = SolutionConfiguration> {
        (
            prop::sample::select(vec![RELEASE, DEBUG, "Profile"]),
            prop::sample::select(vec![WIN32, X64, "ARM"]),
        )
            .prop_map(|(name, platform)| SolutionConfiguration::new(name, platform))
    }

    fn configurations_strategy() -> impl Strategy<Value = Vec<SolutionConfiguration>> {
        prop::collection::vec(configuration_strategy(), 0..20)
    }

    proptest! {
        #[test]
        fn append_keeps_identifiers_unique(items in configurations_strategy()) {
            let configurations: Configurations<SolutionConfiguration> =
                items.iter().cloned().collect();

            for item in &items {
                let stored = configurations.get_by_identifier(&item.name, &item.platform);
                prop_assert_eq!(Some(item), stored);
            }
            let mut unique: Vec<String> = items.iter().map(Configuration::identifier).collect();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), configurations.len());
        }

        #[test]
        fn extend_with_x64_is_idempotent(items in configurations_strategy()) {
            let mut once: Configurations<SolutionConfiguration> = items.into_iter().collect();
            once.extend_with_x64();
            let mut twice = once.clone();
            twice.extend_with_x64();

            prop_assert_eq!(once.len(), twice.len());
            prop_assert_eq!(once.platforms(), twice.platforms());
            prop_assert_eq!(
                identifiers(once.get_sorted(false)),
                identifiers(twice.get_sorted(false))
            );
        }
    }
}
