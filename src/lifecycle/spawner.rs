use std::{fmt, future::Future, pin::Pin};

use bevy::{math::Vec3, tasks::AsyncComputeTaskPool};

/// An in-flight instantiation. Polled to completion by the lifecycle manager.
pub type LoadTask<R, E> = Pin<Box<dyn Future<Output = Result<R, E>> + Send + 'static>>;

/// Capability to create and destroy the visual representation of a cell's content.
///
/// The lifecycle manager never touches assets or representations itself; every creation
/// goes through `instantiate` and every destruction through `release`, no matter how the
/// representation came to be.
pub trait Instantiate: Send + Sync + 'static {
    /// Handle to placeable content, e.g. an asset path or prefab reference.
    type Asset: Clone + Send + Sync + 'static;
    /// Whatever stands in for the content in the world once loaded.
    type Representation: Send + Sync + 'static;
    type Error: fmt::Display + Send + Sync + 'static;

    /// Whether `asset` can be loaded at all. Checked before anything is placed.
    fn is_resolvable(&self, asset: &Self::Asset) -> bool;

    /// Starts loading `asset` and placing it at `position`.
    fn instantiate(&mut self, asset: &Self::Asset, position: Vec3) -> LoadTask<Self::Representation, Self::Error>;

    fn release(&mut self, representation: Self::Representation);
}

/// Runs `load` on the async compute pool and hands back its task.
pub fn spawn_load<R, E>(load: impl Future<Output = Result<R, E>> + Send + 'static) -> LoadTask<R, E>
where R: Send + 'static, E: Send + 'static {
    Box::pin(AsyncComputeTaskPool::get().spawn(load))
}
