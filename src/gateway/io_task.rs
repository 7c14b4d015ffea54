//! Async gateway I/O task — reactor-driven transport bridge.
//!
//! Runs in a dedicated thread using `edge-executor` for cooperative
//! task scheduling and `async-io-mini` for reactor-driven timers (no
//! busy-spinning). Two concurrent futures:
//!
//! 1. **Read** — polls `Transport::read` every 1ms via reactor timer,
//!    feeds bytes through the [`LineDecoder`], and queues complete
//!    request lines on `REQ_CHANNEL` (nudging the control loop with a
//!    `CommandReceived` event).
//! 2. **Write** — truly async via `RESP_CHANNEL.receive().await`
//!    (wakes instantly when the control loop pushes a response).
//!
//! ```text
//!  ┌────────────────────────────────────────────────────────┐
//!  │  I/O Thread                                            │
//!  │  futures_lite::block_on (drives reactor + futures)     │
//!  │  ┌──────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                    │  │
//!  │  │  ┌──────────────┐      ┌───────────────────┐     │  │
//!  │  │  │ Read  1ms ⏱ │      │ Write wake-on-send │     │  │
//!  │  │  └──────────────┘      └───────────────────┘     │  │
//!  │  └──────────────────────────────────────────────────┘  │
//!  └────────────────────────────────────────────────────────┘
//! ```

use core::cell::RefCell;
use core::time::Duration;

use heapless::Vec;
use log::{info, warn};
use std::rc::Rc;

use crate::events::{Event, push_event};

use super::channels::{ApiRequestMsg, ApiResponseMsg, REQ_CHANNEL, RESP_CHANNEL};
use super::codec::LineDecoder;
use super::transport::Transport;

const READ_BUF_SIZE: usize = 256;

fn enqueue_line(line: &[u8]) {
    let mut buf = Vec::new();
    if buf.extend_from_slice(line).is_err() {
        warn!("IO: request line too large for channel buffer");
        return;
    }
    if REQ_CHANNEL.try_send(ApiRequestMsg { line: buf }).is_err() {
        warn!("IO: request channel full, dropping line");
        return;
    }
    push_event(Event::CommandReceived);
}

/// Read task — polls the transport at 1ms intervals. The 1ms reactor
/// timer is wake-based (not `thread::sleep`), so the executor can
/// service the write task between ticks.
async fn read_loop<T: Transport>(transport: Rc<RefCell<T>>) {
    let mut decoder = LineDecoder::new();
    let mut read_buf = [0u8; READ_BUF_SIZE];
    loop {
        {
            let mut t = transport.borrow_mut();
            match t.read(&mut read_buf) {
                Ok(0) => {}
                Ok(n) => decoder.feed(&read_buf[..n], enqueue_line),
                Err(e) => {
                    warn!("IO: transport read error: {:?}", e);
                    decoder.reset();
                }
            }
        }
        async_io_mini::Timer::after(Duration::from_millis(1)).await;
    }
}

/// Write task — truly async, wakes instantly when the control loop
/// pushes a response via `RESP_CHANNEL.try_send()`. No polling.
async fn write_loop<T: Transport>(transport: Rc<RefCell<T>>) {
    loop {
        let resp = RESP_CHANNEL.receive().await;
        let mut t = transport.borrow_mut();
        if let Err(e) = t.write(&resp.data) {
            warn!("IO: transport write failed: {:?}", e);
        } else if let Err(e) = t.flush() {
            warn!("IO: transport flush failed: {:?}", e);
        }
    }
}

/// Entry point for the I/O thread. Sets up the executor, spawns the
/// two async tasks, and drives them via the `async-io-mini` reactor.
fn run_io_loop<T: Transport + 'static>(transport: T) {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    let transport = Rc::new(RefCell::new(transport));

    executor.spawn(read_loop(transport.clone())).detach();
    executor.spawn(write_loop(transport.clone())).detach();

    info!("IO task started (async, reactor-driven)");

    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

// ── Thread spawn ─────────────────────────────────────────────

/// Spawn the I/O task in a dedicated thread pinned to Core 0 (PRO_CPU).
/// Core 0 co-locates with the protocol stacks for cache-local I/O.
pub fn spawn<T: Transport + Send + 'static>(transport: T) -> std::thread::JoinHandle<()> {
    crate::drivers::task_pin::spawn_on_core(
        crate::drivers::task_pin::Core::Pro,
        12,
        16,
        "gw-io\0",
        move || run_io_loop(transport),
    )
}

// ── Channel accessors for the control loop ───────────────────

/// Send a serialized response to the I/O task for transmission.
///
/// The I/O task's write future wakes instantly via
/// `RESP_CHANNEL.receive().await` — no polling delay.
pub fn send_response(data: Vec<u8, { super::codec::MAX_LINE }>) {
    if RESP_CHANNEL.try_send(ApiResponseMsg { data }).is_err() {
        warn!("IO: response channel full, dropping response");
    }
}

/// Try to receive an inbound request line from the I/O task.
pub fn try_recv_request() -> Option<ApiRequestMsg> {
    REQ_CHANNEL.try_receive().ok()
}

// ── Tests ────────────────────────────────────────────────────
