//! Runtime layer for puzzles-with-chat.
//!
//! Everything with shared state or I/O lives here; the solve logic itself is
//! in `pwc-engine`.
//!
//! # Crate Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  pwc-types   : Status, SolveDuration, PuzzleKind, ErrorCode  │
//! │  pwc-event   : Event, EventKind, Topic                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  pwc-engine  : answer parser, puzzle models, solve engines   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  pwc-runtime : registry, monitor, store, config, service     │ ◄── HERE
//! ├──────────────────────────────────────────────────────────────┤
//! │  pwc-cli     : `pwc` binary                                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! ## [`registry`] - Event fan-out
//!
//! - [`Registry`]: topic → subscribers map with bounded, non-blocking delivery
//! - [`SubscriptionId`]: handle returned by `subscribe`
//!
//! ## [`viewer`] - Viewer connections
//!
//! - [`ViewerStream`]: one subscription, unsubscribed on drop
//! - [`EventSink`] and [`run_viewer`]: the per-connection relay loop
//!
//! ## [`monitor`] - Channel membership
//!
//! - [`ChannelMonitor`]: per-integration channel sets with add/remove callbacks
//!
//! ## [`store`] - Persistence
//!
//! - [`KeyValueStore`]: async byte store
//! - [`MemoryStore`], [`FileStore`], [`StoreBackend`]
//!
//! ## [`service`] - Command handling
//!
//! - [`SolveService`]: load, solve, save and publish for every operation
//!
//! ## [`config`] - Configuration
//!
//! - [`PwcConfig`](config::PwcConfig), [`ConfigLoader`](config::ConfigLoader)
//!
//! # Example
//!
//! ```
//! use pwc_engine::spellingbee::{Puzzle, State};
//! use pwc_event::EventKind;
//! use pwc_runtime::config::PwcConfig;
//! use pwc_runtime::{MemoryStore, SolveService};
//!
//! # tokio_test_block_on(async {
//! let service = SolveService::from_config(MemoryStore::new(), &PwcConfig::default());
//! let channel = "streamer".parse().unwrap();
//! let mut viewer = service.connect::<State>(&channel).await.unwrap();
//!
//! let words = ["COUNT".to_string(), "COUNTRY".to_string()];
//! let puzzle = Puzzle::infer(&words, &[], false).unwrap();
//! service.select_puzzle::<State>(&channel, puzzle).await.unwrap();
//!
//! assert_eq!(viewer.recv().await.unwrap().kind, EventKind::Settings);
//! assert_eq!(viewer.recv().await.unwrap().kind, EventKind::State);
//! # });
//! # fn tokio_test_block_on<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod monitor;
pub mod registry;
pub mod service;
pub mod store;
pub mod viewer;

pub use monitor::{ChannelMonitor, ChannelSets, IntegrationId};
pub use registry::{Registry, SubscriptionId, DEFAULT_BUFFER_SIZE};
pub use service::{ServiceError, SolveService};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreBackend, StoreError};
pub use viewer::{run_viewer, EventSink, ViewerExit, ViewerStream};
