//! Macros for ergonomic transition table declaration.

/// Build a [`TransitionTable`](crate::core::TransitionTable) from rows of
/// `origin => destination`, each optionally followed by `, when guard` and
/// `, then action`.
///
/// Guards and actions may be functions or closures with annotated
/// parameters.
///
/// # Example
///
/// ```
/// use polled_fsm::engine::Fsm;
/// use polled_fsm::transition_table;
///
/// #[derive(Default)]
/// struct Turnstile {
///     coins: u32,
///     passed: u32,
/// }
///
/// fn has_coin(fsm: &Fsm<'_, Turnstile>) -> bool {
///     fsm.context().coins > 0
/// }
///
/// fn admit(fsm: &mut Fsm<'_, Turnstile>) {
///     let host = fsm.context_mut();
///     host.coins -= 1;
///     host.passed += 1;
/// }
///
/// let table = transition_table! {
///     0 => 1, when has_coin;
///     1 => 0, then admit;
/// };
///
/// let mut fsm = Fsm::bind(&table, Turnstile { coins: 1, passed: 0 }).unwrap();
/// fsm.fire().unwrap();
/// fsm.fire().unwrap();
///
/// assert_eq!(fsm.state(), 0);
/// assert_eq!(fsm.context().passed, 1);
/// ```
#[macro_export]
macro_rules! transition_table {
    (
        $(
            $origin:expr => $destination:expr
            $(, when $guard:expr)?
            $(, then $action:expr)?
        );* $(;)?
    ) => {{
        #[allow(unused_mut)]
        let mut table = $crate::core::TransitionTable::new();
        $(
            let transition = $crate::core::Transition::new($origin, $destination);
            $( let transition = transition.guard($guard); )?
            $( let transition = transition.action($action); )?
            table.push(transition);
        )*
        table
    }};
}
