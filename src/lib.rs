//! envgroup - Versioned environment groups, synced into namespaces.
//!
//! An environment group is a named bag of variables and secrets. Every
//! change produces a new immutable version (`1, 2, 3, …`); namespaces link
//! to one exact version of each group they use.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Administrative command-line interface
//! └── core/             # Core library components
//!     ├── config        # envgroup.toml management
//!     ├── domain/       # Groups, drafts, versioned names, change sets
//!     ├── store/        # Versioned object store
//!     │   ├── mod       # VersionedStore trait
//!     │   ├── memory    # In-process backend
//!     │   └── fs        # Filesystem backend
//!     ├── groups        # Base group manager (no-op detection, new versions)
//!     ├── sync          # Namespace linking
//!     └── reconcile     # Per-app default group reconciliation
//! ```
//!
//! # Example
//!
//! ```
//! use envgroup::core::domain::Proposal;
//! use envgroup::core::groups::Groups;
//! use envgroup::core::store::Memory;
//! use envgroup::core::sync::NamespaceSync;
//! use envgroup::core::types::{Labels, Variables};
//!
//! let store = Memory::new();
//! let groups = Groups::new(&store);
//!
//! let mut variables = Variables::new();
//! variables.insert("HOST".to_string(), "db.internal".to_string());
//! let outcome = groups
//!     .create_or_update("db-creds", &Proposal::new(variables, Variables::new()), &Labels::new())
//!     .unwrap();
//! assert_eq!(outcome.version, 1);
//!
//! let synced = NamespaceSync::new(&store)
//!     .latest_to_namespace("db-creds", "team-a", &Labels::new())
//!     .unwrap();
//! assert_eq!(synced.versioned_name.to_string(), "db-creds.1");
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::domain::{EnvironmentGroup, GroupRef, Proposal, SyncedEnvironmentGroup, VersionedName};
pub use crate::core::store::VersionedStore;
pub use crate::error::{Error, Result};
