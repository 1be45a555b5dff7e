use crate::errors::Result;
use crate::queue::NotifyQueue;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedNotifyQueueFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn NotifyQueue>>> + Send>>;
pub type NotifyQueueConstructor = Arc<dyn Fn() -> BoxedNotifyQueueFuture + Send + Sync>;

static NOTIFY_QUEUE_REGISTRY: Lazy<RwLock<HashMap<String, NotifyQueueConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_notify_queue_plugin<S: Into<String>>(name: S, constructor: NotifyQueueConstructor) {
    let name = name.into();
    let mut registry = NOTIFY_QUEUE_REGISTRY
        .write()
        .expect("Queue registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_notify_queue_plugin(name: &str) -> Option<NotifyQueueConstructor> {
    NOTIFY_QUEUE_REGISTRY
        .read()
        .expect("Queue registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_notify_queue_registry() {
    let registry = NOTIFY_QUEUE_REGISTRY
        .read()
        .expect("Queue registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No notify queue plugins registered.");
    } else {
        tracing::debug!("Registered notify queue plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}
