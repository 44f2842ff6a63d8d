//! Core library for jiralint
//!
//! This crate implements the **Functional Core** of the jiralint application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! The jiralint project uses a two-crate architecture to enforce separation
//! of concerns:
//!
//! - **`jiralint_core`** (this crate): the pure issue evaluation engine with
//!   zero I/O
//! - **`jiralint`**: HTTP calls, configuration and rendering (the Imperative
//!   Shell)
//!
//! ## Functional Core Principles
//!
//! All functions in this crate adhere to these principles:
//!
//! - **Pure functions**: Same input always produces the same output
//! - **No side effects**: No I/O operations, no external state mutations
//! - **Total**: Evaluation never errors; non-ok outcomes are domain signals
//! - **Testable**: Can be tested with simple fixture data, no mocking required
//!
//! # Module Organization
//!
//! - [`issue`]: Jira wire model, board context, enrichment ([`issue::enrich`])
//! - [`checks`]: the ordered registry of health checks
//! - [`evaluate`]: the reducer producing an [`evaluate::IssueAction`] and the
//!   [`evaluate::quality`] letter grade
//! - [`time`]: business-day arithmetic and Jira duration formatting
//!
//! # Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use jiralint_core::evaluate::{evaluate, quality};
//! use jiralint_core::issue::{enrich, CustomFieldNames, Issue, IssueFields};
//!
//! let issue = Issue {
//!     key: "PROJ-1".to_string(),
//!     fields: IssueFields::default(),
//!     changelog: None,
//! };
//!
//! // Enrich using a pure function (no HTTP required)
//! let enhanced = enrich(
//!     issue,
//!     None,
//!     "https://jira.example.com/browse/PROJ-1".to_string(),
//!     &CustomFieldNames::default(),
//! );
//!
//! // Evaluate against one shared "now" and grade the result
//! let action = evaluate(&enhanced, Utc::now(), &[]);
//! let grade = quality(&action);
//! assert!(["A+", "A", "B", "C", "F"].contains(&grade));
//! ```

pub mod checks;
pub mod evaluate;
pub mod issue;
pub mod time;
