//! Console and JSON rendering of hash and diff results.

use avghash::ImageHash;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

const RULE: &str = "--------------------------------------";

/// Wall time spent on one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed(TimeDelta);

impl Elapsed {
    pub fn new(delta: TimeDelta) -> Self {
        Self(delta)
    }

    pub fn nanos(&self) -> i64 {
        self.0.num_nanoseconds().unwrap_or(i64::MAX)
    }

    pub fn micros(&self) -> i64 {
        self.0.num_microseconds().unwrap_or(i64::MAX)
    }

    pub fn millis(&self) -> i64 {
        self.0.num_milliseconds()
    }
}

impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}ns -> {}μs -> {}ms",
            self.nanos(),
            self.micros(),
            self.millis()
        )
    }
}

impl Serialize for Elapsed {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Parts {
            nanos: i64,
            micros: i64,
            millis: i64,
        }
        Parts {
            nanos: self.nanos(),
            micros: self.micros(),
            millis: self.millis(),
        }
        .serialize(serializer)
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct HashReport {
    pub path: PathBuf,
    pub code: u64,
    pub fingerprint: String,
    pub elapsed: Elapsed,
    pub timestamp: DateTime<Utc>,
}

impl HashReport {
    pub fn new(path: PathBuf, hash: &ImageHash, elapsed: Elapsed) -> Self {
        Self {
            path,
            code: hash.code,
            fingerprint: hash.binary.clone(),
            elapsed,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for HashReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "image: {}", self.path.display())?;
        writeln!(f, "hash: {}", self.code)?;
        writeln!(f, "fingerprint: {}", self.fingerprint)?;
        writeln!(f, "elapsed: {}", self.elapsed)?;
        write!(f, "{}", RULE)
    }
}

/// An input that could not be hashed.
#[derive(Serialize, Debug, Clone)]
pub struct HashFailure {
    pub path: PathBuf,
    pub error: String,
}

impl fmt::Display for HashFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "image {} could not be hashed: {}",
            self.path.display(),
            self.error
        )
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum HashEntry {
    Hashed(HashReport),
    Failed(HashFailure),
}

impl HashEntry {
    pub fn is_failed(&self) -> bool {
        matches!(self, HashEntry::Failed(_))
    }
}

impl fmt::Display for HashEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashEntry::Hashed(report) => fmt::Display::fmt(report, f),
            HashEntry::Failed(failure) => fmt::Display::fmt(failure, f),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct DiffReport {
    pub src: PathBuf,
    pub dst: PathBuf,
    pub similarity: f32,
    pub percent: f32,
    pub elapsed: Elapsed,
    pub timestamp: DateTime<Utc>,
}

impl DiffReport {
    pub fn new(src: PathBuf, dst: PathBuf, similarity: f32, elapsed: Elapsed) -> Self {
        Self {
            src,
            dst,
            similarity,
            percent: similarity * 100.0,
            elapsed,
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", RULE)?;
        writeln!(f, "images: {}, {}", self.src.display(), self.dst.display())?;
        writeln!(f, "similarity: {:.4}", self.similarity)?;
        writeln!(f, "percent: {:.4}%", self.percent)?;
        writeln!(f, "elapsed: {}", self.elapsed)?;
        write!(f, "{}", RULE)
    }
}
