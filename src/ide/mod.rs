//! IDE features: completion proposals and hover for dialect markup.
//!
//! This module is the interface between the dialect registry and the host
//! editor. The host owns the markup document and answers cursor queries
//! through [`CursorContext`]; everything here is a function of a
//! [`ProjectView`](crate::registry::ProjectView) and that context.
//!
//! ## Usage
//!
//! The recommended way to use this module is through `AssistHost`:
//!
//! ```ignore
//! use dialect_assist::ide::AssistHost;
//!
//! let host = AssistHost::new(AssistConfig::default());
//! host.initialize();
//!
//! let analysis = host.analysis(&project);
//! let proposals = analysis.completions(&ctx, offset);
//! ```

mod analysis;
mod completion;
mod context;
mod documentation;
mod hover;
pub mod text_utils;

pub use analysis::{Analysis, AssistHost};
pub use completion::{CompletionProposal, ProposalKind, completions};
pub use context::{
    CursorContext, CursorContextError, CursorLocation, FixedCursorContext, MarkupNode,
    collect_namespaces,
};
pub use documentation::item_documentation;
pub use hover::{HoverResult, hover};
pub use text_utils::{helper_pattern_before, processor_pattern_before};
