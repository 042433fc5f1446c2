//! Handler for `dpk version`.

use miette::Result;

use dpk_ops::ops_version;

use crate::cli::VersionAction;

pub fn exec(action: VersionAction) -> Result<()> {
    match action {
        VersionAction::Compare { a, b, fuzzy } => ops_version::compare(&a, &b, fuzzy),
        VersionAction::Validate { versions } => ops_version::validate(&versions),
        VersionAction::Satisfies {
            version,
            requirement,
        } => {
            if ops_version::satisfies(&version, &requirement)? {
                println!("{version} satisfies {requirement}");
            } else {
                println!("{version} does not satisfy {requirement}");
            }
            Ok(())
        }
    }
}
