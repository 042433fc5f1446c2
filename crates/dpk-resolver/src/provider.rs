//! Selection of the package that best provides a requirement.

use std::cmp::Ordering;
use std::collections::HashMap;

use dpk_core::index::PackageIndex;
use dpk_core::requirement::{Capability, Requirement};
use dpk_core::version::{self, CompareMode, VersionError};

/// Every capability in an index, grouped by name.
///
/// Each package contributes its own `name=version` plus everything it
/// declares in `provides`.
#[derive(Debug, Clone, Default)]
pub struct ProviderIndex {
    providers: HashMap<String, Vec<(Capability, usize)>>,
}

impl ProviderIndex {
    pub fn new(index: &PackageIndex) -> Self {
        let mut providers: HashMap<String, Vec<(Capability, usize)>> = HashMap::new();
        for (id, package) in index.packages.iter().enumerate() {
            let own = Capability::Specific {
                name: package.name.clone(),
                version: package.version.clone(),
            };
            for capability in std::iter::once(own).chain(package.provides.iter().cloned()) {
                providers
                    .entry(capability.name().to_string())
                    .or_default()
                    .push((capability, id));
            }
        }
        Self { providers }
    }

    /// Number of distinct capability names.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Pick the package that best satisfies `requirement`.
    ///
    /// Highest provider priority wins (unset counts as 0), then the higher
    /// package version, then the package that comes first in the index.
    pub fn resolve(
        &self,
        index: &PackageIndex,
        requirement: &Requirement,
    ) -> Result<Option<usize>, VersionError> {
        let Some(candidates) = self.providers.get(&requirement.name) else {
            return Ok(None);
        };

        let mut best: Option<usize> = None;
        for (capability, id) in candidates {
            if !capability.satisfies(requirement)? {
                continue;
            }
            best = match best {
                Some(current) if !prefer(index, *id, current) => Some(current),
                _ => Some(*id),
            };
        }
        Ok(best)
    }
}

/// Whether `candidate` should replace `current` as the chosen provider.
fn prefer(index: &PackageIndex, candidate: usize, current: usize) -> bool {
    let (a, b) = (&index.packages[candidate], &index.packages[current]);
    let priority = a
        .provider_priority
        .unwrap_or(0)
        .cmp(&b.provider_priority.unwrap_or(0));
    match priority {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => match version::compare(&a.version, &b.version, CompareMode::Normal) {
            Ok(Ordering::Greater) => true,
            Ok(Ordering::Less) => false,
            _ => candidate < current,
        },
    }
}
