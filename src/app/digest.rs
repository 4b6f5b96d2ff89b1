//! Streaming file digest computation
//!
//! A missing local file is an expected outcome here, not an error: it simply
//! means the artifact has never been fetched. Any other read problem (e.g.
//! permission denied) also yields `None` so the caller re-fetches, but the
//! underlying cause is logged since a re-fetch is unlikely to cure it.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, warn};

use crate::app::hash::Md5Digest;
use crate::constants::files;

/// Compute the MD5 digest of a file, streaming its content in chunks.
///
/// Returns `None` when the file does not exist or cannot be read.
pub async fn file_digest(path: &Path) -> Option<Md5Digest> {
    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No local file at {}", path.display());
            return None;
        }
        Err(e) => {
            warn!("Cannot open {} for digest: {}", path.display(), e);
            return None;
        }
    };

    let mut context = md5::Context::new();
    let mut buffer = vec![0u8; files::READ_CHUNK_SIZE];
    loop {
        let read = match file.read(&mut buffer).await {
            Ok(read) => read,
            Err(e) => {
                warn!("Read error while digesting {}: {}", path.display(), e);
                return None;
            }
        };
        if read == 0 {
            break;
        }
        context.consume(&buffer[..read]);
    }

    Some(Md5Digest::from_bytes(context.compute().0))
}
