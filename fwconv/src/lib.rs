//! Firewall configuration translation between vendor dialects.
//!
//! Four dialects are understood: Cisco ASA and Cisco FTD (line-directive CLI),
//! FortiGate (`config`/`edit`/`set` blocks) and Palo Alto PAN-OS (XML). Every
//! source text is normalized into one vendor-neutral [`model::ConfigModel`]
//! and re-emitted in the target dialect. Constructs the target cannot express
//! are carried as annotated "not converted" comments instead of being dropped.
//!
//! # Architecture
//!
//! ## Model
//!
//! - [`model`]: the intermediate representation, plus [`model::defaults`] with
//!   every substituted value
//! - [`netmask`]: fixed dotted-mask / prefix table
//!
//! ## Dialects
//!
//! - [`parse`]: text → IR, one module per dialect; parsers never fail
//! - [`generate`]: IR → text, one module per dialect
//!
//! ## Orchestration
//!
//! - [`vendor`]: vendor ids
//! - [`registry`]: vendor catalogue and directed support matrix
//! - [`engine`]: `convert(text, source, target)`
//! - [`stats`]: per-category counts
//! - [`references`]: group/policy reference findings (strict mode, `check`)
//! - [`report`]: terminal and JSON rendering
//!
//! # Examples
//!
//! ```
//! use fwconv::engine::convert;
//!
//! let text = "hostname fw1\ninterface Gi0/1\n nameif inside\n ip address 10.0.0.1 255.255.255.0\n!";
//! let conversion = convert(text, "cisco-asa", "fortigate").unwrap();
//! assert_eq!(conversion.stats.interfaces, 1);
//! assert!(conversion.output.contains("set alias \"inside\""));
//! ```

pub mod engine;
pub mod generate;
pub mod model;
pub mod netmask;
pub mod parse;
pub mod references;
pub mod registry;
pub mod report;
pub mod stats;
pub mod vendor;
