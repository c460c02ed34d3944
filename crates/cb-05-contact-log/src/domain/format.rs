use shared_types::ContactEvent;

/// Whole seconds, truncated toward zero.
fn secs(t: f64) -> i64 {
    t as i64
}

fn flag(b: bool) -> u8 {
    u8::from(b)
}

/// Render one event as a log line (without newline).
pub fn format_line(event: &ContactEvent) -> String {
    match event {
        ContactEvent::Startup { at, total_unique } => {
            format!("startup,{},{}", secs(*at), total_unique)
        }
        ContactEvent::Add {
            at,
            total_unique,
            address,
            is_new,
            kind,
        } => format!(
            "add,{},{},{},{},{}",
            secs(*at),
            total_unique,
            address,
            flag(*is_new),
            kind
        ),
        ContactEvent::Hop {
            at,
            total_unique,
            old_address,
            new_address,
            is_new,
        } => format!(
            "hop,{},{},{}->{},{}",
            secs(*at),
            total_unique,
            old_address,
            new_address,
            flag(*is_new)
        ),
        ContactEvent::Delete {
            at,
            total_unique,
            address,
            is_new,
            first_seen,
            last_seen,
            duration,
        } => format!(
            "del,{},{},{},{},{},{},{}",
            secs(*at),
            total_unique,
            address,
            flag(*is_new),
            secs(*first_seen),
            secs(*last_seen),
            secs(*duration)
        ),
    }
}
