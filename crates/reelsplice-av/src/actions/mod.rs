//! Media processing actions.
//!
//! - Stream-copy cutting of one span
//! - Joining clips (lossless or re-encoded)
//! - Subtitle burn-in

mod burn;
mod concat;
mod cut;

pub use burn::burn_subtitles;
pub use concat::{
    concat_filter_graph, concat_list_entry, write_concat_list, ConcatStrategy, ReencodeConcat,
    ReencodeSettings, StreamCopyConcat, CONCAT_LIST_NAME,
};
pub use cut::{cut_args, Cutter, FfmpegCutter};
