use soroban_sdk::{Env, IntoVal, Val};

// Ledgers are ~5s apart: bump entries once they fall under ~30 days of
// remaining life, extending them to ~180 days.
pub(crate) const TTL_THRESHOLD: u32 = 518_400;
pub(crate) const TTL_EXTEND_TO: u32 = 3_110_400;

/// Extends the TTL shared by every instance-storage key.
pub(crate) fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Extends the TTL of a single persistent entry.
pub(crate) fn extend_persistent<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val>,
{
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
