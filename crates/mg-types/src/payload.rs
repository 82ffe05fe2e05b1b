//! Grain payload bytes, optionally loaded on first access.
//!
//! A [`Payload`] is either already resident or backed by a loader that
//! runs at most once. Clones share the same load state, so materialising
//! through any clone makes the bytes visible to all of them.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::TypeError;

type Loader = Box<dyn FnOnce() -> Result<Bytes, TypeError> + Send>;

enum PayloadState {
    Unloaded(Loader),
    Loaded(Bytes),
    Failed(String),
}

struct PayloadInner {
    length: usize,
    state: Mutex<PayloadState>,
}

/// The byte payload of a grain.
#[derive(Clone)]
pub struct Payload {
    inner: Arc<PayloadInner>,
}

impl Payload {
    /// A payload whose bytes are already in memory.
    pub fn loaded(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        Self {
            inner: Arc::new(PayloadInner {
                length: bytes.len(),
                state: Mutex::new(PayloadState::Loaded(bytes)),
            }),
        }
    }

    /// A payload of known `length` whose bytes come from `loader` on first
    /// access.
    pub fn from_loader<F>(length: usize, loader: F) -> Self
    where
        F: FnOnce() -> Result<Bytes, TypeError> + Send + 'static,
    {
        Self {
            inner: Arc::new(PayloadInner {
                length,
                state: Mutex::new(PayloadState::Unloaded(Box::new(loader))),
            }),
        }
    }

    /// A payload read from `length` bytes at `offset` of a shared stream.
    ///
    /// The stream position is restored after loading.
    pub fn from_reader_at<R>(reader: Arc<Mutex<R>>, offset: u64, length: usize) -> Self
    where
        R: Read + Seek + Send + 'static,
    {
        Self::from_loader(length, move || {
            let mut reader = reader.lock().unwrap_or_else(PoisonError::into_inner);
            read_at(&mut *reader, offset, length)
        })
    }

    /// Length in bytes. Never forces a load.
    pub fn len(&self) -> usize {
        self.inner.length
    }

    pub fn is_empty(&self) -> bool {
        self.inner.length == 0
    }

    /// Returns `true` once the bytes are resident.
    pub fn is_loaded(&self) -> bool {
        matches!(*self.lock_state(), PayloadState::Loaded(_))
    }

    /// Return the payload bytes, running the loader if this is the first
    /// access. A failed load is remembered and reported on every call.
    pub fn materialize(&self) -> Result<Bytes, TypeError> {
        let mut state = self.lock_state();
        if matches!(*state, PayloadState::Unloaded(_)) {
            let pending = std::mem::replace(&mut *state, PayloadState::Failed(String::new()));
            if let PayloadState::Unloaded(loader) = pending {
                *state = self.finish_load(loader());
            }
        }

        match &*state {
            PayloadState::Loaded(bytes) => Ok(bytes.clone()),
            PayloadState::Failed(reason) => Err(TypeError::Load(reason.clone())),
            PayloadState::Unloaded(_) => Err(TypeError::Load("payload never loaded".into())),
        }
    }

    fn finish_load(&self, loaded: Result<Bytes, TypeError>) -> PayloadState {
        let failure = match loaded {
            Ok(bytes) if bytes.len() == self.inner.length => {
                debug!(len = bytes.len(), "payload loaded");
                return PayloadState::Loaded(bytes);
            }
            Ok(bytes) => format!(
                "expected {} bytes, loader produced {}",
                self.inner.length,
                bytes.len()
            ),
            Err(TypeError::Load(reason)) => reason,
            Err(e) => e.to_string(),
        };
        warn!(reason = %failure, "payload load failed");
        PayloadState::Failed(failure)
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, PayloadState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::loaded(bytes)
    }
}

impl From<Bytes> for Payload {
    fn from(bytes: Bytes) -> Self {
        Self::loaded(bytes)
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.lock_state() {
            PayloadState::Unloaded(_) => "unloaded",
            PayloadState::Loaded(_) => "loaded",
            PayloadState::Failed(_) => "failed",
        };
        write!(f, "Payload({state}, {} bytes)", self.inner.length)
    }
}

fn read_at<R: Read + Seek + ?Sized>(
    reader: &mut R,
    offset: u64,
    length: usize,
) -> Result<Bytes, TypeError> {
    let io_err = |e: std::io::Error| TypeError::Load(e.to_string());
    let saved = reader.stream_position().map_err(io_err)?;
    reader.seek(SeekFrom::Start(offset)).map_err(io_err)?;
    let mut buf = vec![0u8; length];
    let read = reader.read_exact(&mut buf);
    reader.seek(SeekFrom::Start(saved)).map_err(io_err)?;
    read.map_err(io_err)?;
    Ok(Bytes::from(buf))
}
