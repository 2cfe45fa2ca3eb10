//! # CLI Module
//!
//! Command-line interface for inspecting and checking route templates.
//! Every command prints JSON to stdout; logs go to stderr.
//!
//! ## Commands
//!
//! ### `parse`
//!
//! Print the parsed structure of a template:
//!
//! ```bash
//! routepat parse "{controller=Home}/{action=Index}/{id?}"
//! ```
//!
//! ### `match`
//!
//! Match one or more paths. Exits non-zero if none matched:
//!
//! ```bash
//! routepat match "{p1}/{p2}.{p3?}" /one/two.three /one/two
//! routepat match "{controller}/{action}" /Home --default action=Index
//! ```
//!
//! ### `substitute`
//!
//! Bake required values into a pattern. `key=` requires an empty value and
//! `key=*any*` accepts any value:
//!
//! ```bash
//! routepat substitute "{controller=Home}/{action=Index}" --require controller=Store
//! ```
//!
//! ### `combine`
//!
//! ```bash
//! routepat combine "api/" "/{id}"
//! ```
//!
//! ### `check`
//!
//! Validate every route in a YAML, TOML or JSON route file. Exits non-zero
//! if any route is invalid:
//!
//! ```bash
//! routepat check --routes routes.yaml
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use routepat::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
