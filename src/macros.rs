//! Macros for error/warning printing

/// Expand to an error message
#[macro_export]
macro_rules! bwm_error {
    ($($err:tt)*) => ({
        use colored::Colorize;
        eprintln!("{}: {}", "[bwm error]".red().bold(), format!($($err)*));
    })
}

/// Expand to a fatal message and terminate the process
///
/// Within tests this panics instead, so the failure can be observed
#[macro_export]
macro_rules! bwm_fatal {
    ($($err:tt)*) => ({
        let msg = format!($($err)*);
        log::error!("{}", msg);
        if cfg!(test) {
            panic!("[bwm fatal]: {}", msg);
        }
        {
            use colored::Colorize;
            eprintln!("{}: {}", "[bwm fatal]".yellow().bold(), msg);
        }
        log::logger().flush();
        std::process::exit(1)
    })
}

/// Terminate the process if the condition does not hold
#[macro_export]
macro_rules! bwm_assert {
    ($cond:expr, $($err:tt)+) => ({
        if !$cond {
            $crate::bwm_fatal!($($err)+);
        }
    })
}

/// Terminate the process if the two values differ
#[macro_export]
macro_rules! bwm_assert_eq {
    ($left:expr, $right:expr, $($err:tt)+) => ({
        match (&$left, &$right) {
            (left, right) => {
                if left != right {
                    $crate::bwm_fatal!(
                        "{} (left: {:?}, right: {:?})",
                        format!($($err)+),
                        left,
                        right
                    );
                }
            },
        }
    })
}
