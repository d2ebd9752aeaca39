//! CeCe - plugin runtime for an agent-based cell simulator
//!
//! This library loads native plugin libraries, checks that they were built
//! against a compatible host, and resolves extension names (modules,
//! objects, programs, initializers and loaders) to instances for a running
//! simulation.
//!
//! # Modules
//!
//! - [`plugin`]: Plugin loading, the manager, repositories and per-simulation contexts
//! - [`simulation`]: Extension traits and the simulation state handed to them
//! - [`config`]: Runtime configuration and serialization
//!
//! # Example
//!
//! ```ignore
//! use cece::plugin::{Context, Manager, SharedLibraryLoader};
//! use cece::simulation::Simulation;
//!
//! let mut manager = Manager::new();
//! manager.add_loader(Box::new(SharedLibraryLoader::new()))?;
//! manager.add_directories(Manager::default_directories())?;
//!
//! let mut context = Context::new(&manager);
//! context.import_plugin("diffusion")?;
//!
//! let simulation = Simulation::new("demo");
//! let module = context.create_module("diffusion", &simulation)?;
//! ```

pub mod config;
pub mod plugin;
pub mod simulation;
