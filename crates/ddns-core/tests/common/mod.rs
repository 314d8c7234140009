//! Test doubles shared by the reconciler contract tests
//!
//! These doubles record every call so tests can assert on exactly which
//! requests a reconciliation would have sent.

#![allow(dead_code)]

use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, DnsRecordSnapshot, IpSource, RecordUpdate};
use std::collections::{HashMap, HashSet, VecDeque};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpSource that plays back a fixed script of answers
///
/// Once the script is exhausted the last answer repeats.
pub struct ScriptedIpSource {
    script: Mutex<VecDeque<std::result::Result<String, String>>>,
    last: Mutex<std::result::Result<String, String>>,
    call_count: Arc<AtomicUsize>,
}

impl ScriptedIpSource {
    /// Always answer with `ip`
    pub fn fixed(ip: &str) -> Self {
        Self::sequence(vec![Ok(ip.to_string())])
    }

    /// Always fail, as if both echo services were down
    pub fn failing() -> Self {
        Self::sequence(vec![Err("primary and fallback unreachable".to_string())])
    }

    /// Answer with each entry in turn
    pub fn sequence(script: Vec<std::result::Result<String, String>>) -> Self {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Err("empty script".to_string()));
        Self {
            script: Mutex::new(script.into()),
            last: Mutex::new(last),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handle on the call counter that survives boxing the source
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.call_count)
    }
}

#[async_trait::async_trait]
impl IpSource for ScriptedIpSource {
    async fn current(&self) -> Result<String> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        let next = self.script.lock().unwrap().pop_front();
        let answer = match next {
            Some(answer) => {
                *self.last.lock().unwrap() = answer.clone();
                answer
            }
            None => self.last.lock().unwrap().clone(),
        };

        answer.map_err(Error::ip_lookup)
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A DnsProvider backed by an in-memory table that records every call
pub struct RecordingProvider {
    records: HashMap<String, DnsRecordSnapshot>,
    /// Names whose lookup fails with a network error
    unreachable: HashSet<String>,
    /// Names whose lookup returns malformed data
    malformed: HashSet<String>,
    /// Body returned by every update call
    update_body: String,
    find_call_count: Arc<AtomicUsize>,
    updates: Arc<Mutex<Vec<(String, RecordUpdate)>>>,
}

impl RecordingProvider {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            unreachable: HashSet::new(),
            malformed: HashSet::new(),
            update_body: r#"{"result":{},"success":true,"errors":[],"messages":[]}"#.to_string(),
            find_call_count: Arc::new(AtomicUsize::new(0)),
            updates: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a record the provider knows about
    pub fn with_record(mut self, name: &str, id: &str, content: &str) -> Self {
        self.records.insert(
            name.to_string(),
            DnsRecordSnapshot {
                id: id.to_string(),
                content: content.to_string(),
            },
        );
        self
    }

    /// Make lookups of `name` fail at the transport level
    pub fn with_unreachable(mut self, name: &str) -> Self {
        self.unreachable.insert(name.to_string());
        self
    }

    /// Make lookups of `name` fail with malformed provider data
    pub fn with_malformed(mut self, name: &str) -> Self {
        self.malformed.insert(name.to_string());
        self
    }

    /// Set the raw body returned by update calls
    pub fn with_update_body(mut self, body: &str) -> Self {
        self.update_body = body.to_string();
        self
    }

    /// Create a provider with the same table that shares the call log
    pub fn sharing_log_with(other: &Self) -> Self {
        Self {
            records: other.records.clone(),
            unreachable: other.unreachable.clone(),
            malformed: other.malformed.clone(),
            update_body: other.update_body.clone(),
            find_call_count: Arc::clone(&other.find_call_count),
            updates: Arc::clone(&other.updates),
        }
    }

    /// Get the number of times find_record() was called
    pub fn find_call_count(&self) -> usize {
        self.find_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    /// Get every (record_id, update) pair sent so far
    pub fn updates(&self) -> Vec<(String, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DnsProvider for RecordingProvider {
    async fn find_record(&self, record_name: &str) -> Result<Option<DnsRecordSnapshot>> {
        self.find_call_count.fetch_add(1, Ordering::SeqCst);

        if self.unreachable.contains(record_name) {
            return Err(Error::network("connection refused"));
        }
        if self.malformed.contains(record_name) {
            return Err(Error::data("expected value at line 1 column 1"));
        }

        Ok(self.records.get(record_name).cloned())
    }

    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<String> {
        self.updates
            .lock()
            .unwrap()
            .push((record_id.to_string(), update.clone()));
        Ok(self.update_body.clone())
    }

    fn is_success(&self, body: &str) -> bool {
        body.contains("success")
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

/// Log lines written while a capture guard is held
///
/// `#[tokio::test]` runs on a current-thread runtime, so a thread-scoped
/// default subscriber sees every event the reconciler emits.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LogCapture {
    /// Everything logged so far
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    /// The first line containing `needle`, panicking with the full log if none does
    pub fn line_containing(&self, needle: &str) -> String {
        let contents = self.contents();
        contents
            .lines()
            .find(|line| line.contains(needle))
            .map(str::to_string)
            .unwrap_or_else(|| panic!("no log line contains {:?}; got:\n{}", needle, contents))
    }
}

/// Capture plain-text log output until the returned guard is dropped
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let sink = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || sink.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
