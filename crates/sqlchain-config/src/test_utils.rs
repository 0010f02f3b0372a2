use std::env;

/// Runs `f` with the given variables set (`Some`) or removed (`None`),
/// restoring the previous environment afterwards.
pub fn with_env<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let saved: Vec<_> = vars
        .iter()
        .map(|(key, _)| (*key, env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        match value {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    let result = f();

    for (key, old) in saved {
        match old {
            Some(v) => env::set_var(key, v),
            None => env::remove_var(key),
        }
    }

    result
}
