use std::{fmt::Debug, rc::Rc};

use super::handle_events::EventHooks;
use crate::subscriber::Completion;

/// Hooks logging every lifecycle event on the `rxcombine::print` target.
pub(crate) fn print_hooks<Item, Err>(prefix: String) -> EventHooks<Item, Err>
where
  Item: Debug,
  Err: Debug,
{
  let prefix: Rc<str> = Rc::from(prefix);
  let (p_sub, p_req, p_out, p_done, p_cancel) =
    (prefix.clone(), prefix.clone(), prefix.clone(), prefix.clone(), prefix);

  EventHooks::default()
    .on_subscription(move || tracing::info!(target: "rxcombine::print", prefix = %p_sub, "receive subscription"))
    .on_request(move |demand| {
      tracing::info!(target: "rxcombine::print", prefix = %p_req, "request {demand}")
    })
    .on_output(move |value| {
      tracing::info!(target: "rxcombine::print", prefix = %p_out, "receive value: ({value:?})")
    })
    .on_completion(move |completion| match completion {
      Completion::Finished => {
        tracing::info!(target: "rxcombine::print", prefix = %p_done, "receive finished")
      }
      Completion::Failure(err) => {
        tracing::info!(target: "rxcombine::print", prefix = %p_done, "receive failure: ({err:?})")
      }
    })
    .on_cancel(move || tracing::info!(target: "rxcombine::print", prefix = %p_cancel, "receive cancel"))
}
