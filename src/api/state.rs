//! Shared state passed to all API handlers

use std::sync::Arc;

use crate::plugin::Plugin;

#[derive(Clone)]
pub struct ApiState {
    pub plugin: Arc<Plugin>,
}

impl ApiState {
    pub fn new(plugin: Arc<Plugin>) -> Self {
        Self { plugin }
    }
}
