//! photonspring — Monte Carlo photon-transport kernel core
//!
//! Per-packet physics machinery of a Monte Carlo photon-transport
//! simulator: configurable-precision numerics, vector/matrix geometry,
//! boundary optics, scattering direction updates, a multiply-with-carry
//! random number generator, linear lookup-table sampling and lock-free
//! weight accumulation. The surrounding propagation loop, source and
//! detector models, and host dispatch live outside this crate and drive
//! these primitives once per simulated interaction.
//!
//! ## Modules
//!   - `config` — immutable per-launch kernel configuration and device caps
//!   - `real` — precision-generic scalar trait and fast-math facade
//!   - `vector` — 2/3/4-component vectors and square matrices over three scalar domains
//!   - `geometry` — rectangle, circle and slot containment tests
//!   - `boundary` — critical angle, Fresnel reflectance, reflect/refract
//!   - `scattering` — propagation-direction update after a scattering event
//!   - `rng` — per-thread multiply-with-carry uniform generator
//!   - `lut` — linear-interpolation lookup-table sampler
//!   - `accumulator` — atomic weight deposits, write-combining cache, packet counter
//!   - `events` — per-packet event flag bitmask
//!   - `debug` — conditional debug printing
//!   - `tolerances` — centralized test tolerances with justification
//!   - `error` — kernel core error type

pub mod accumulator;
pub mod boundary;
pub mod config;
pub mod debug;
pub mod error;
pub mod events;
pub mod geometry;
pub mod lut;
pub mod real;
pub mod rng;
pub mod scattering;
pub mod tolerances;
pub mod vector;
