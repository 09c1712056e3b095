use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest_cookie_store::{CookieStore, CookieStoreMutex};

use crate::error::academy::{AcademyError, Result};

/// 持久化到 jsonl 文件的 cookie 仓库，登录会话靠它在多次运行之间保持
pub struct CookieJar {
    store: Arc<CookieStoreMutex>,
    path: PathBuf,
}

impl CookieJar {
    /// 读取失败时退回空仓库，只打印警告
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let store = if path.exists() {
            match File::open(&path) {
                Ok(file) => CookieStore::load_all(BufReader::new(file), |line| {
                    serde_json::from_str::<cookie_store::Cookie>(line)
                })
                .unwrap_or_else(|err| {
                    log::warn!("failed to load cookies from {}: {}", path.display(), err);
                    CookieStore::default()
                }),
                Err(err) => {
                    log::warn!("failed to open cookie file {}: {}", path.display(), err);
                    CookieStore::default()
                }
            }
        } else {
            CookieStore::default()
        };

        CookieJar {
            store: Arc::new(CookieStoreMutex::new(store)),
            path,
        }
    }

    pub fn store(&self) -> Arc<CookieStoreMutex> {
        Arc::clone(&self.store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.store
            .lock()
            .map(|store| store.iter_any().next().is_none())
            .unwrap_or(true)
    }

    pub fn clear(&self) -> Result<()> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| AcademyError::Cookie("cookie store lock poisoned".into()))?;
        store.clear();
        Ok(())
    }

    /// 包括会话 cookie 一起保存，后端的登录 cookie 通常没有过期时间
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = self
            .store
            .lock()
            .map_err(|_| AcademyError::Cookie("cookie store lock poisoned".into()))?;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        store
            .save_incl_expired_and_nonpersistent(&mut writer, serde_json::to_string)
            .map_err(|err| AcademyError::Cookie(err.to_string()))
    }
}
