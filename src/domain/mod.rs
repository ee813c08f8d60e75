// ============================================================================
// Domain Layer - Business Logic
// ============================================================================
//
// Each aggregate has its own subdirectory. This layer depends on the
// generic event sourcing infrastructure, never the other way round.
//
// ============================================================================

pub mod customer;
