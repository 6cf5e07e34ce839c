//! Macros for ergonomic configuration construction.

/// Build a [`MachineConfig`](crate::config::MachineConfig) from an inline
/// transition table.
///
/// Expands to a [`MachineConfigBuilder`](crate::config::MachineConfigBuilder)
/// chain, so the result is a validated `Result<MachineConfig, ConfigError>`.
///
/// # Example
///
/// ```
/// use waypoint_fsm::fsm_config;
///
/// let config = fsm_config! {
///     initial: green,
///     states: {
///         green => { timer: yellow },
///         yellow => { timer: red },
///         red => { timer: green, fault: blinking },
///         blinking => {},
///     }
/// }
/// .unwrap();
///
/// assert_eq!(config.initial, "green");
/// assert_eq!(config.states.len(), 4);
/// ```
#[macro_export]
macro_rules! fsm_config {
    (
        initial: $initial:ident,
        states: {
            $(
                $state:ident => { $($event:ident : $target:ident),* $(,)? }
            ),* $(,)?
        } $(,)?
    ) => {
        $crate::config::MachineConfigBuilder::new()
            .initial(stringify!($initial))
            $(
                .state(
                    $crate::config::StateBuilder::new(stringify!($state))
                        $(.on(stringify!($event), stringify!($target)))*
                )
            )*
            .build()
    };
}
