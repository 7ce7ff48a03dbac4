/// Logs the given values at INFO: `info!(log, "started", KV::new("port", 80))`.
#[macro_export]
macro_rules! info {
    ($log:expr $(, $value:expr)* $(,)?) => {
        $log.info(&[$($crate::Loggable::to_log_value(&$value)),*])
    };
}

/// Logs the given values at DEBUG when the logger's debug flag is set.
#[macro_export]
macro_rules! debug {
    ($log:expr $(, $value:expr)* $(,)?) => {
        $log.debug(&[$($crate::Loggable::to_log_value(&$value)),*])
    };
}

/// Logs the given values at FATAL and exits with status 1.
#[macro_export]
macro_rules! fatal {
    ($log:expr $(, $value:expr)* $(,)?) => {
        $log.fatal(&[$($crate::Loggable::to_log_value(&$value)),*])
    };
}

/// Creates a child logger whose context is extended with the given values.
#[macro_export]
macro_rules! child {
    ($log:expr $(, $value:expr)* $(,)?) => {
        $log.child(&[$($crate::Loggable::to_log_value(&$value)),*])
    };
}

/// Converts each argument into a [`Value`](crate::Value), e.g. for the
/// free functions of the default logger.
#[macro_export]
macro_rules! values {
    ($($value:expr),* $(,)?) => {
        [$($crate::Loggable::to_log_value(&$value)),*]
    };
}

#[cfg(test)]
mod tests {
    use crate::value::{KV, Lbl};
    use crate::writer::MemorySink;
    use crate::{Logger, Value};

    #[test]
    fn macros_convert_arguments() {
        let mem = MemorySink::new();
        let mut log = Logger::new(mem.clone());
        log.set_debug(true);

        let log = crate::child!(log, "svc", KV::new("port", 8080));
        crate::info!(log, "up", 3, Lbl::new("ok"));
        crate::debug!(log);

        let lines = mem.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(r#" INFO "svc" port=8080 "up" 3 ok"#));
        assert!(lines[1].ends_with(r#" DEBUG "svc" port=8080"#));
    }

    #[test]
    fn values_builds_array() {
        let vals: [Value; 2] = crate::values!("a", 1);
        assert_eq!(vals[0], Value::Quoted("a".to_string()));
        assert_eq!(vals[1], Value::Plain("1".to_string()));
    }
}
