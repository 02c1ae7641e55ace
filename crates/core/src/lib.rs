//! Domain logic for the Pokédex catalog.
//!
//! Everything in this crate is free of network I/O: entry types, the
//! filter state and its URL codec, the favorites store, result
//! composition (candidate selection, sorting, pagination), the search
//! debounce policy and the user-facing error/empty states. The remote
//! gateway and fetch orchestration live in `pokedex-pokeapi`.

pub mod compose;
pub mod debounce;
pub mod error;
pub mod favorites;
pub mod filter;
pub mod location;
pub mod naming;
pub mod pagination;
pub mod types;
pub mod view;
