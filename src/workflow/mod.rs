pub mod guide_ctx;
pub mod guide_flow;

pub use guide_ctx::GuideCtx;
pub use guide_flow::{GuideFlow, GuideOutcome};
