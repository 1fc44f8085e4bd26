// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll driven master and slave.

use core::time::Duration;

use crate::{
    buffer::FrameBuffer,
    codec::rtu::{
        BROADCAST_ID, Header, MAX_FRAME_LEN, MAX_SLAVE_ID, RequestAdu, ResponseAdu, SlaveId,
        client::{decode_response, encode_request},
        server::encode_response,
    },
    dispatch::dispatch,
    error::Error,
    frame::{
        Exception, ExceptionResponse, FunctionCode, RequestPdu, Response, ResponsePdu, Telegram,
    },
    timing::{DEFAULT_IDLE_THRESHOLD, DEFAULT_RESPONSE_TIMEOUT, inter_frame_delay},
    transport::{Clock, Timestamp, Transport},
    util::{packed_coils_len, unpack_register_coils},
    validate::{validate_answer, validate_request_within},
};

/// Transaction state.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    /// A master query waits for its reply.
    Waiting,
}

/// Diagnostic counters. They wrap on overflow.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Complete frames taken off the line
    pub received: u32,
    /// Frames transmitted
    pub sent: u32,
    /// Failed transactions
    pub errors: u32,
}

/// What a successful [`Device::poll`] did.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No complete frame yet.
    Pending,
    /// A frame not meant for this device was dropped.
    Ignored,
    /// A broadcast write was executed without answering.
    Broadcast,
    /// A transaction completed: the slave sent its response or the
    /// master accepted the reply. Carries the frame length.
    Answered(usize),
}

pub type PollResult = Result<Status, Error>;

#[derive(Debug, Clone, Copy)]
struct PendingQuery {
    slave: SlaveId,
    function: FunctionCode,
    quantity: u16,
}

/// A Modbus RTU station on a serial line.
///
/// Id `0` makes the device a master that issues [`Device::query`]s,
/// any id in `1..=247` a slave that answers requests addressed to it.
/// Both are driven by calling [`Device::poll`] as often as possible.
///
/// `N` is the capacity of the receive and transmit buffers.
#[derive(Debug)]
pub struct Device<T, C, R, const N: usize = MAX_FRAME_LEN> {
    link: Link<T, C, N>,
    registers: R,
}

#[derive(Debug)]
struct Link<T, C, const N: usize> {
    transport: T,
    clock: C,
    id: SlaveId,
    state: State,
    last_error: Option<Error>,
    timeout: Duration,
    idle_threshold: Duration,
    tx_guard_time: Duration,
    sent_at: Timestamp,
    pending: Option<PendingQuery>,
    rx: FrameBuffer<N>,
    tx: [u8; N],
    stats: Stats,
}

impl<T, C, R, const N: usize> Device<T, C, R, N>
where
    T: Transport,
    C: Clock,
    R: AsRef<[u16]> + AsMut<[u16]>,
{
    /// Create a master (`id == 0`) or a slave.
    pub fn new(transport: T, clock: C, registers: R, id: SlaveId) -> Result<Self, Error> {
        if id > MAX_SLAVE_ID {
            return Err(Error::InvalidSlaveId(id));
        }
        Ok(Self {
            link: Link::new(transport, clock, id),
            registers,
        })
    }

    /// Create a master. Replies to read queries are stored in `registers`,
    /// starting at index 0.
    pub fn master(transport: T, clock: C, registers: R) -> Self {
        Self {
            link: Link::new(transport, clock, 0),
            registers,
        }
    }

    /// Create a slave serving `registers`.
    pub fn slave(transport: T, clock: C, registers: R, id: SlaveId) -> Result<Self, Error> {
        if id == BROADCAST_ID {
            return Err(Error::InvalidSlaveId(id));
        }
        Self::new(transport, clock, registers, id)
    }

    /// Bring the line into a defined state.
    ///
    /// Releases the driver, drains pending input and resets the state,
    /// the last error and the counters.
    pub fn start(&mut self) {
        let link = &mut self.link;
        link.transport.set_driver_enable(false);
        while link.transport.read_byte().is_some() {}
        link.rx.reset();
        link.state = State::Idle;
        link.pending = None;
        link.last_error = None;
        link.stats = Stats::default();
    }

    /// Change the slave id. `0` and ids above 247 are rejected.
    pub fn set_id(&mut self, id: SlaveId) -> Result<(), Error> {
        if id == BROADCAST_ID || id > MAX_SLAVE_ID {
            return Err(Error::InvalidSlaveId(id));
        }
        self.link.id = id;
        Ok(())
    }

    /// How long a master waits for a reply, in milliseconds.
    pub fn set_timeout(&mut self, millis: u32) {
        self.link.timeout = Duration::from_millis(u64::from(millis));
    }

    /// Silence that terminates a frame.
    pub fn set_idle_threshold(&mut self, idle: Duration) {
        self.link.idle_threshold = idle;
    }

    /// Derive the idle threshold (t3.5) from the line's baud rate.
    pub fn set_baud_rate(&mut self, baud_rate: u32) {
        self.link.idle_threshold = inter_frame_delay(baud_rate);
    }

    /// Keep the driver enabled this long after the last byte was flushed.
    pub fn set_tx_guard_time(&mut self, guard: Duration) {
        self.link.tx_guard_time = guard;
    }

    /// Send a request to a slave.
    ///
    /// Only a master in [`State::Idle`] may query. On success the device
    /// is [`State::Waiting`] until [`Device::poll`] reports the outcome.
    pub fn query(&mut self, telegram: &Telegram<'_>) -> Result<(), Error> {
        self.link.query(telegram)
    }

    /// Drive the device: take in received bytes and act on complete frames.
    pub fn poll(&mut self) -> PollResult {
        let Self { link, registers } = self;
        link.poll(registers.as_mut())
    }

    /// Like [`Device::poll`], but reads and writes `registers` instead of
    /// the device's own register image.
    pub fn poll_with_registers(&mut self, registers: &mut [u16]) -> PollResult {
        self.link.poll(registers)
    }

    #[must_use]
    pub const fn id(&self) -> SlaveId {
        self.link.id
    }

    #[must_use]
    pub const fn is_master(&self) -> bool {
        self.link.id == 0
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.link.state
    }

    /// The error of the most recent failed transaction.
    ///
    /// Cleared by a new query.
    #[must_use]
    pub const fn last_error(&self) -> Option<Error> {
        self.link.last_error
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.link.timeout
    }

    #[must_use]
    pub const fn idle_threshold(&self) -> Duration {
        self.link.idle_threshold
    }

    #[must_use]
    pub const fn tx_guard_time(&self) -> Duration {
        self.link.tx_guard_time
    }

    /// `true` if more than the timeout has passed since the last query.
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        self.link.is_timed_out(self.link.clock.now())
    }

    #[must_use]
    pub const fn in_count(&self) -> u32 {
        self.link.stats.received
    }

    #[must_use]
    pub const fn out_count(&self) -> u32 {
        self.link.stats.sent
    }

    #[must_use]
    pub const fn err_count(&self) -> u32 {
        self.link.stats.errors
    }

    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.link.stats
    }

    #[must_use]
    pub fn registers(&self) -> &[u16] {
        self.registers.as_ref()
    }

    pub fn registers_mut(&mut self) -> &mut [u16] {
        self.registers.as_mut()
    }

    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.link.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.link.transport
    }

    /// Tear the device down.
    pub fn into_parts(self) -> (T, C, R) {
        (self.link.transport, self.link.clock, self.registers)
    }
}

impl<T, C, const N: usize> Link<T, C, N>
where
    T: Transport,
    C: Clock,
{
    fn new(transport: T, clock: C, id: SlaveId) -> Self {
        Self {
            transport,
            clock,
            id,
            state: State::Idle,
            last_error: None,
            timeout: DEFAULT_RESPONSE_TIMEOUT,
            idle_threshold: DEFAULT_IDLE_THRESHOLD,
            tx_guard_time: Duration::ZERO,
            sent_at: Duration::ZERO,
            pending: None,
            rx: FrameBuffer::new(),
            tx: [0; N],
            stats: Stats::default(),
        }
    }

    fn query(&mut self, telegram: &Telegram<'_>) -> Result<(), Error> {
        if self.id != 0 {
            return Err(Error::NotMaster);
        }
        if self.state != State::Idle {
            return Err(Error::AlreadyWaiting);
        }
        if telegram.slave == BROADCAST_ID || telegram.slave > MAX_SLAVE_ID {
            return Err(Error::InvalidTargetId(telegram.slave));
        }
        let mut data = [0u8; N];
        let request = telegram.to_request(&mut data)?;
        let len = encode_request(
            RequestAdu {
                hdr: Header {
                    slave: telegram.slave,
                },
                pdu: RequestPdu(request),
            },
            &mut self.tx,
        )?;
        // whatever arrived before belongs to no transaction
        self.rx.reset();
        self.transmit(len);
        self.sent_at = self.clock.now();
        self.pending = Some(PendingQuery {
            slave: telegram.slave,
            function: telegram.function,
            quantity: telegram.quantity,
        });
        self.state = State::Waiting;
        self.last_error = None;
        Ok(())
    }

    fn poll(&mut self, registers: &mut [u16]) -> PollResult {
        if self.id == 0 {
            self.poll_master(registers)
        } else {
            self.poll_slave(registers)
        }
    }

    fn poll_master(&mut self, registers: &mut [u16]) -> PollResult {
        let now = self.clock.now();
        let pending = match (self.state, self.pending) {
            (State::Waiting, Some(pending)) => pending,
            _ => {
                // stray input
                self.state = State::Idle;
                if let Err(err) = self.rx.feed(&mut self.transport, now) {
                    return Err(self.record(err));
                }
                let stray = self.rx.take_frame(now, self.idle_threshold).is_some();
                return Ok(if stray { Status::Ignored } else { Status::Pending });
            }
        };
        if self.is_timed_out(now) {
            #[cfg(feature = "log")]
            log::warn!("No reply from slave {} within {:?}", pending.slave, self.timeout);
            self.finish();
            return Err(self.record(Error::NoReply));
        }
        if let Err(err) = self.rx.feed(&mut self.transport, now) {
            self.finish();
            return Err(self.record(err));
        }
        let Some(frame) = self.rx.take_frame(now, self.idle_threshold) else {
            return Ok(Status::Pending);
        };
        self.stats.received = self.stats.received.wrapping_add(1);
        if frame[0] != pending.slave {
            #[cfg(feature = "log")]
            log::warn!(
                "Dropping frame from slave {} while waiting for slave {}",
                frame[0],
                pending.slave
            );
            return Ok(Status::Ignored);
        }
        let result = accept_reply(pending, frame, registers);
        self.finish();
        result.map(Status::Answered).map_err(|err| self.record(err))
    }

    fn poll_slave(&mut self, registers: &mut [u16]) -> PollResult {
        let now = self.clock.now();
        if let Err(err) = self.rx.feed(&mut self.transport, now) {
            return Err(self.record(err));
        }
        let Some(frame) = self.rx.take_frame(now, self.idle_threshold) else {
            return Ok(Status::Pending);
        };
        self.stats.received = self.stats.received.wrapping_add(1);
        let (reply, result) = serve::<N>(self.id, frame, registers, &mut self.tx);
        if let Some(len) = reply {
            self.transmit(len);
        }
        result.map_err(|err| self.record(err))
    }

    /// Send `tx[..len]`, framed by the driver enable line.
    fn transmit(&mut self, len: usize) {
        self.transport.set_driver_enable(true);
        self.transport.write_bytes(&self.tx[..len]);
        self.transport.flush();
        if !self.tx_guard_time.is_zero() {
            let start = self.clock.now();
            while self.clock.now().saturating_sub(start) < self.tx_guard_time {
                core::hint::spin_loop();
            }
        }
        self.transport.set_driver_enable(false);
        self.stats.sent = self.stats.sent.wrapping_add(1);
    }

    fn is_timed_out(&self, now: Timestamp) -> bool {
        now.saturating_sub(self.sent_at) > self.timeout
    }

    fn finish(&mut self) {
        self.state = State::Idle;
        self.pending = None;
    }

    fn record(&mut self, err: Error) -> Error {
        self.stats.errors = self.stats.errors.wrapping_add(1);
        self.last_error = Some(err);
        err
    }
}

/// Store the reply to `pending` in `registers`.
fn accept_reply(pending: PendingQuery, frame: &[u8], registers: &mut [u16]) -> Result<usize, Error> {
    validate_answer(frame).inspect_err(|&_err| {
        #[cfg(feature = "log")]
        log::debug!("Reply from slave {} rejected: {_err}", pending.slave);
    })?;
    let response = match decode_response(frame)?.pdu.0 {
        Ok(response) => response,
        Err(exception) => return Err(Error::RemoteException(exception)),
    };
    if FunctionCode::from(response) != pending.function {
        return Err(Error::Exception(Exception::IllegalFunction));
    }
    let quantity = usize::from(pending.quantity);
    match response {
        Response::ReadCoils(coils) | Response::ReadDiscreteInputs(coils) => {
            if coils.payload().len() != packed_coils_len(quantity) {
                return Err(Error::ByteCount(frame[2]));
            }
            unpack_register_coils(coils.payload(), quantity, registers, 0)?;
        }
        Response::ReadHoldingRegisters(words) | Response::ReadInputRegisters(words) => {
            if words.len() != quantity || words.payload().len() != quantity * 2 {
                return Err(Error::ByteCount(frame[2]));
            }
            words.copy_to_registers(registers, 0)?;
        }
        Response::WriteSingleCoil(_, _)
        | Response::WriteSingleRegister(_, _)
        | Response::WriteMultipleCoils(_, _)
        | Response::WriteMultipleRegisters(_, _) => {}
    }
    Ok(frame.len())
}

/// Answer a request frame as slave `id`.
///
/// Returns the length of the reply in `tx`, if one is to be sent, and
/// the outcome of the transaction.
fn serve<const N: usize>(
    id: SlaveId,
    frame: &[u8],
    registers: &mut [u16],
    tx: &mut [u8; N],
) -> (Option<usize>, PollResult) {
    let target = frame[0];
    if target != id && target != BROADCAST_ID {
        return (None, Ok(Status::Ignored));
    }
    let broadcast = target == BROADCAST_ID;
    if let Err(err) = validate_request_within(frame, registers.len(), N) {
        #[cfg(feature = "log")]
        log::warn!("Rejecting request: {err}");
        return match err {
            Error::Exception(exception) if !broadcast => {
                (exception_reply(id, frame[1], exception, tx), Err(err))
            }
            _ => (None, Err(err)),
        };
    }
    if broadcast {
        if !FunctionCode::new(frame[1]).is_write() {
            return (None, Ok(Status::Ignored));
        }
        return match dispatch(frame, registers, tx) {
            Ok(_) => (None, Ok(Status::Broadcast)),
            Err(err) => (None, Err(err)),
        };
    }
    match dispatch(frame, registers, tx) {
        Ok(len) => (Some(len), Ok(Status::Answered(len))),
        Err(_err) => {
            #[cfg(feature = "log")]
            log::error!("Failed to execute request: {_err}");
            let exception = Exception::ServerDeviceFailure;
            (
                exception_reply(id, frame[1], exception, tx),
                Err(Error::Exception(exception)),
            )
        }
    }
}

/// `[id][function | 0x80][exception][crc]`
fn exception_reply(id: SlaveId, function: u8, exception: Exception, tx: &mut [u8]) -> Option<usize> {
    if function & 0x80 != 0 {
        return None;
    }
    encode_response(
        ResponseAdu {
            hdr: Header { slave: id },
            pdu: ResponsePdu(Err(ExceptionResponse {
                function: FunctionCode::new(function),
                exception,
            })),
        },
        tx,
    )
    .ok()
}
