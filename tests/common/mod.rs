//! A register-level simulation of an nRF24L01+ and the peer it talks to.

#![allow(dead_code)]

use std::collections::VecDeque;

use nrf24_link::{
    radio::{commands, registers, Transport},
    StatusFlags,
};

const RX_DR: u8 = 0x40;
const TX_DS: u8 = 0x20;
const MAX_RT: u8 = 0x10;
const FIFO_DEPTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimError;

impl core::fmt::Display for SimError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "simulated bus failure")
    }
}

/// A payload waiting in the TX FIFO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxEntry {
    pub payload: Vec<u8>,
    pub no_ack: bool,
}

pub struct SimRadio {
    regs: [u8; 0x20],
    rx_addr_p0: [u8; 5],
    rx_addr_p1: [u8; 5],
    tx_addr: [u8; 5],
    status: u8,
    tx_fifo: VecDeque<TxEntry>,
    rx_fifo: VecDeque<(u8, Vec<u8>)>,
    ce: bool,

    /// The address the peer listens on. `None` means nobody answers.
    pub peer_address: Option<Vec<u8>>,
    /// Payloads the peer attaches to its next acknowledgements.
    pub peer_ack_payloads: VecDeque<Vec<u8>>,
    /// The number of retransmissions each acknowledged payload takes.
    pub peer_retries: u8,
    /// Transmissions never finish (a retry cycle that outlives any timeout).
    pub stalled: bool,
    /// Fail the next exchange.
    pub fail_next: bool,

    /// Every payload that went on air, with the TX address it was sent to.
    pub sent: Vec<(Vec<u8>, Vec<u8>)>,
    /// Every register write: (register, bytes).
    pub writes: Vec<(u8, Vec<u8>)>,
    /// Registers other than STATUS that were written while CE was high.
    pub writes_while_enabled: Vec<u8>,
    pub exchanges: usize,
    pub elapsed_us: u64,
}

impl Default for SimRadio {
    fn default() -> Self {
        let mut regs = [0u8; 0x20];
        // power on reset values
        regs[registers::CONFIG as usize] = 0x08;
        regs[registers::EN_AA as usize] = 0x3F;
        regs[registers::EN_RXADDR as usize] = 0x03;
        regs[registers::SETUP_AW as usize] = 0x03;
        regs[registers::SETUP_RETR as usize] = 0x03;
        regs[registers::RF_CH as usize] = 0x02;
        regs[registers::RF_SETUP as usize] = 0x0E;
        Self {
            regs,
            rx_addr_p0: [0xE7; 5],
            rx_addr_p1: [0xC2; 5],
            tx_addr: [0xE7; 5],
            status: 0,
            tx_fifo: VecDeque::new(),
            rx_fifo: VecDeque::new(),
            ce: false,
            peer_address: None,
            peer_ack_payloads: VecDeque::new(),
            peer_retries: 0,
            stalled: false,
            fail_next: false,
            sent: Vec::new(),
            writes: Vec::new(),
            writes_while_enabled: Vec::new(),
            exchanges: 0,
            elapsed_us: 0,
        }
    }
}

impl SimRadio {
    pub fn register(&self, register: u8) -> u8 {
        self.regs[register as usize]
    }

    fn width(&self) -> usize {
        (self.regs[registers::SETUP_AW as usize] & 3) as usize + 2
    }

    /// The content of an address register, truncated to the configured width.
    pub fn address(&self, register: u8) -> Vec<u8> {
        let width = self.width();
        match register {
            registers::RX_ADDR_P0 => self.rx_addr_p0[..width].to_vec(),
            registers::RX_ADDR_P1 => self.rx_addr_p1[..width].to_vec(),
            registers::TX_ADDR => self.tx_addr[..width].to_vec(),
            _ => {
                let mut address = self.rx_addr_p1[..width].to_vec();
                address[0] = self.regs[register as usize];
                address
            }
        }
    }

    pub fn tx_fifo(&self) -> &VecDeque<TxEntry> {
        &self.tx_fifo
    }

    pub fn ce(&self) -> bool {
        self.ce
    }

    /// A frame arrives over the air on `pipe`. Dropped if the RX FIFO is full.
    pub fn deliver(&mut self, pipe: u8, payload: &[u8]) -> bool {
        if self.rx_fifo.len() >= FIFO_DEPTH {
            return false;
        }
        self.rx_fifo.push_back((pipe, payload.to_vec()));
        self.status |= RX_DR;
        true
    }

    fn status_byte(&self) -> u8 {
        let rx_pipe = self.rx_fifo.front().map_or(7, |(pipe, _)| *pipe);
        let tx_full = (self.tx_fifo.len() >= FIFO_DEPTH) as u8;
        self.status | (rx_pipe << 1) | tx_full
    }

    fn fifo_status(&self) -> u8 {
        let mut value = 0;
        if self.rx_fifo.is_empty() {
            value |= 1;
        }
        if self.rx_fifo.len() >= FIFO_DEPTH {
            value |= 2;
        }
        if self.tx_fifo.is_empty() {
            value |= 0x10;
        }
        if self.tx_fifo.len() >= FIFO_DEPTH {
            value |= 0x20;
        }
        value
    }

    /// Would the peer's acknowledgement be received?
    ///
    /// The peer must listen on the TX address, and the ACK comes back on pipe 0.
    fn peer_answers(&self) -> bool {
        let width = self.width();
        let Some(peer) = &self.peer_address else {
            return false;
        };
        peer[..] == self.tx_addr[..width]
            && self.rx_addr_p0[..width] == self.tx_addr[..width]
            && self.regs[registers::EN_RXADDR as usize] & 1 == 1
    }

    /// Move the air forward by one transmission, if the radio is in active TX mode.
    fn step(&mut self) {
        let config = self.regs[registers::CONFIG as usize];
        let powered_tx = config & 2 == 2 && config & 1 == 0;
        if !self.ce || !powered_tx || self.stalled || self.status & MAX_RT != 0 {
            return;
        }
        let Some(entry) = self.tx_fifo.front().cloned() else {
            return;
        };
        let width = self.width();
        self.sent
            .push((entry.payload.clone(), self.tx_addr[..width].to_vec()));
        if entry.no_ack {
            self.tx_fifo.pop_front();
            self.status |= TX_DS;
            return;
        }
        if !self.peer_answers() {
            let count = self.regs[registers::SETUP_RETR as usize] & 0xF;
            self.regs[registers::OBSERVE_TX as usize] = count;
            self.status |= MAX_RT;
            return;
        }
        self.tx_fifo.pop_front();
        self.regs[registers::OBSERVE_TX as usize] = self.peer_retries & 0xF;
        self.status |= TX_DS;
        if let Some(ack) = self.peer_ack_payloads.pop_front() {
            self.deliver(0, &ack);
        }
    }

    fn write(&mut self, register: u8, data: &[u8]) {
        self.writes.push((register, data.to_vec()));
        if self.ce && register != registers::STATUS {
            self.writes_while_enabled.push(register);
        }
        let Some(&value) = data.first() else {
            return;
        };
        match register {
            registers::STATUS => self.status &= !(value & (RX_DR | TX_DS | MAX_RT)),
            registers::RX_ADDR_P0 => copy_address(&mut self.rx_addr_p0, data),
            registers::RX_ADDR_P1 => copy_address(&mut self.rx_addr_p1, data),
            registers::TX_ADDR => copy_address(&mut self.tx_addr, data),
            registers::FIFO_STATUS | registers::OBSERVE_TX | registers::RPD => {}
            _ => self.regs[register as usize] = value,
        }
    }

    fn read(&self, register: u8, data: &mut [u8]) {
        match register {
            registers::STATUS => data.fill(self.status_byte()),
            registers::FIFO_STATUS => data.fill(self.fifo_status()),
            registers::RX_ADDR_P0 | registers::RX_ADDR_P1 | registers::TX_ADDR => {
                let address = self.address(register);
                let len = data.len().min(address.len());
                data[..len].copy_from_slice(&address[..len]);
            }
            _ => data.fill(self.regs[register as usize]),
        }
    }
}

fn copy_address(target: &mut [u8; 5], data: &[u8]) {
    let len = data.len().min(5);
    target[..len].copy_from_slice(&data[..len]);
}

impl Transport for SimRadio {
    type Error = SimError;

    fn exchange(&mut self, command: u8, data: &mut [u8]) -> Result<StatusFlags, Self::Error> {
        if self.fail_next {
            self.fail_next = false;
            return Err(SimError);
        }
        self.exchanges += 1;
        self.step();
        let status = StatusFlags::from_bits(self.status_byte());
        match command {
            c if c & 0xE0 == commands::R_REGISTER => self.read(c & registers::MASK, data),
            c if c & 0xE0 == commands::W_REGISTER => {
                self.write(c & registers::MASK, data);
                data.fill(0);
            }
            commands::W_TX_PAYLOAD | commands::W_TX_PAYLOAD_NO_ACK => {
                if self.tx_fifo.len() < FIFO_DEPTH {
                    self.tx_fifo.push_back(TxEntry {
                        payload: data.to_vec(),
                        no_ack: command == commands::W_TX_PAYLOAD_NO_ACK,
                    });
                }
            }
            c if c & 0xF8 == commands::W_ACK_PAYLOAD => {
                if self.tx_fifo.len() < FIFO_DEPTH {
                    self.tx_fifo.push_back(TxEntry {
                        payload: data.to_vec(),
                        no_ack: false,
                    });
                }
            }
            commands::R_RX_PL_WID => {
                let len = self.rx_fifo.front().map_or(0, |(_, p)| p.len() as u8);
                data.fill(len);
            }
            commands::R_RX_PAYLOAD => {
                if let Some((_, payload)) = self.rx_fifo.pop_front() {
                    let len = data.len().min(payload.len());
                    data[..len].copy_from_slice(&payload[..len]);
                    data[len..].fill(0);
                }
            }
            commands::FLUSH_TX => {
                self.tx_fifo.clear();
            }
            commands::FLUSH_RX => {
                self.rx_fifo.clear();
            }
            _ => {}
        }
        Ok(status)
    }

    fn set_enable_line(&mut self, high: bool) -> Result<(), Self::Error> {
        self.ce = high;
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.ce
    }

    fn delay_us(&mut self, us: u32) {
        self.elapsed_us += us as u64;
    }
}
