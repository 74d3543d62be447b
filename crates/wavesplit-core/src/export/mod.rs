//! Split export service
//!
//! Renders the included splits of a session to disk, either one file per
//! split or all of them joined into a single file.
//!
//! # Architecture
//!
//! ```text
//! UI Layer
//!     │
//!     │ start_export(ExportJob) / start_concat(ConcatJob)
//!     ▼
//! ExportService (rayon ThreadPool, 4 threads)
//!     │
//!     │ par_iter().for_each()
//!     ▼
//! Per-Split Worker:
//!   1. Slice + trim + resample + channel convert
//!   2. Encode (WAV via hound, FLAC via flacenc, MP3 via LAME, Ogg via libvorbis)
//!   3. Send ExportProgress::SplitComplete / SplitFailed
//!     │
//!     │ ExportProgress (mpsc)
//!     ▼
//! UI Layer (tick subscription drains the receiver)
//! ```

mod encode;
mod error;
mod message;
mod service;
mod settings;

pub use encode::{
    check_encodable, encode_to_file, render_concat, render_segment, write_flac, write_mp3,
    write_ogg, write_wav, RenderedAudio, MP3_SAMPLE_RATES,
};
pub use error::{EncodeError, EncodeResult};
pub use message::ExportProgress;
pub use service::{ConcatJob, ExportJob, ExportService};
pub use settings::{
    snap_sample_rate, ChannelLayout, ConcatSettings, EncodeTarget, ExportFormat, ExportSettings,
    Quality, DEFAULT_SAMPLE_RATE, SAMPLE_RATES,
};
