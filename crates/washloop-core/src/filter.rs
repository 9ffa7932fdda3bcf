//! The washout filter capability consumed by the loop.

use std::{error::Error, marker::PhantomData};

/// Maps one motion sample to a position.
///
/// The loop calls this once per tick from its own thread, passing the six
/// scalars in the order ax, ay, az, wx, wy, wz. Implementations are free to
/// keep state between calls (frequency-shaping filters usually do).
pub trait Filter: Send {
    type Position: Clone + Default + Send;
    type Error: Error + Send + Sync + 'static;

    #[allow(clippy::too_many_arguments)]
    fn filter(
        &mut self,
        acceleration_x: f64,
        acceleration_y: f64,
        acceleration_z: f64,
        angular_velocity_x: f64,
        angular_velocity_y: f64,
        angular_velocity_z: f64,
    ) -> Result<Self::Position, Self::Error>;
}

impl<F: Filter + ?Sized> Filter for Box<F> {
    type Position = F::Position;
    type Error = F::Error;

    fn filter(
        &mut self,
        ax: f64,
        ay: f64,
        az: f64,
        wx: f64,
        wy: f64,
        wz: f64,
    ) -> Result<Self::Position, Self::Error> {
        (**self).filter(ax, ay, az, wx, wy, wz)
    }
}

/// A [`Filter`] backed by a closure. Built with [`filter_fn`].
pub struct FilterFn<F, P, E> {
    f: F,
    _marker: PhantomData<fn() -> (P, E)>,
}

/// Wraps a closure taking the six motion scalars as a [`Filter`].
pub fn filter_fn<F, P, E>(f: F) -> FilterFn<F, P, E>
where
    F: FnMut(f64, f64, f64, f64, f64, f64) -> Result<P, E> + Send,
    P: Clone + Default + Send,
    E: Error + Send + Sync + 'static,
{
    FilterFn {
        f,
        _marker: PhantomData,
    }
}

impl<F, P, E> Filter for FilterFn<F, P, E>
where
    F: FnMut(f64, f64, f64, f64, f64, f64) -> Result<P, E> + Send,
    P: Clone + Default + Send,
    E: Error + Send + Sync + 'static,
{
    type Position = P;
    type Error = E;

    fn filter(&mut self, ax: f64, ay: f64, az: f64, wx: f64, wy: f64, wz: f64) -> Result<P, E> {
        (self.f)(ax, ay, az, wx, wy, wz)
    }
}
