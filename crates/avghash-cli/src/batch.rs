//! Concurrent hashing of many images.
//!
//! Each image is hashed on a blocking task; a failure is recorded against its
//! input and never stops the remaining images. Entries come back in input order.

use crate::report::{Elapsed, HashEntry, HashFailure, HashReport};
use avghash::Hasher;
use chrono::Utc;
use futures::future::join_all;
use std::path::PathBuf;
use tracing::{error, info};

pub async fn hash_all(hasher: Hasher, paths: Vec<PathBuf>) -> Vec<HashEntry> {
    let tasks = paths.into_iter().map(move |path| async move {
        let task_path = path.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let started = Utc::now();
            let result = hasher.hash_file(&task_path);
            (result, Utc::now() - started)
        })
        .await;

        match joined {
            Ok((Ok(hash), elapsed)) => {
                info!(path = %path.display(), code = hash.code, "Hashed image");
                HashEntry::Hashed(HashReport::new(path, &hash, Elapsed::new(elapsed)))
            }
            Ok((Err(e), _)) => {
                let e = anyhow::Error::from(e);
                error!(path = %path.display(), error = %format!("{:#}", e), "Failed to hash image");
                HashEntry::Failed(HashFailure {
                    path,
                    error: format!("{:#}", e),
                })
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "Hash task joined with error");
                HashEntry::Failed(HashFailure {
                    path,
                    error: e.to_string(),
                })
            }
        }
    });

    join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let dir = std::env::temp_dir().join(format!("avghash-batch-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let good = dir.join("good.png");
        DynamicImage::ImageRgba8(RgbaImage::from_fn(32, 32, |x, _| {
            Rgba([(x * 8) as u8, 0, 0, 255])
        }))
        .save(&good)
        .unwrap();
        let missing = dir.join("missing.png");

        let entries = hash_all(
            Hasher::default(),
            vec![missing.clone(), good.clone(), missing.clone()],
        )
        .await;

        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_failed());
        assert!(entries[2].is_failed());
        match &entries[1] {
            HashEntry::Hashed(report) => {
                assert_eq!(report.path, good);
                assert_eq!(report.fingerprint.len(), 64);
            }
            HashEntry::Failed(failure) => panic!("unexpected failure: {}", failure),
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        assert!(hash_all(Hasher::default(), Vec::new()).await.is_empty());
    }
}
