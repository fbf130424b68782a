/*!
 * Translation orchestration engine.
 *
 * This module contains the core functionality for translating text units
 * into many languages. It is split into several submodules:
 *
 * - `protect`: Protection of variables, links and URLs during translation
 * - `cache`: Persistent translation cache with TTL pruning
 * - `invoker`: Retrying wrapper around the external translator
 * - `core`: Cache-aware translation of one unit (`TranslationService`)
 * - `scheduler`: Bounded concurrent fan-out over units and languages
 * - `stats`: Run-wide counters
 */

// Re-export main types for easier usage
pub use self::cache::{CacheEntry, TranslationCache};
pub use self::core::{TranslationOptions, TranslationService};
pub use self::invoker::{InvocationOutcome, InvocationStatus, RetryPolicy, TranslationInvoker};
pub use self::protect::{PlaceholderMap, SubstringProtector};
pub use self::scheduler::{JobScheduler, LanguageResult, NoProgress, ProgressReporter, RunReport, SchedulerState};
pub use self::stats::{StatsSnapshot, TranslationStats};

// Submodules
pub mod cache;
pub mod core;
pub mod invoker;
pub mod protect;
pub mod scheduler;
pub mod stats;
