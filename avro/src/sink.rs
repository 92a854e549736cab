// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Writing the Avro binary encoding into a growable buffer.

use crate::util::{zig_i32, zig_i64};

/// An append-only buffer of Avro binary data.
///
/// Arrays and maps are written in two phases: the items are appended after
/// [`begin_container`](Sink::begin_container) and [`finish_container`](Sink::finish_container)
/// inserts the block header in front of them once their number is known.
#[derive(Debug, Default)]
pub struct Sink {
    buffer: Vec<u8>,
    /// Start offsets of the containers that are not finished yet, innermost last
    open: Vec<usize>,
}

/// An array or a map whose items are being written to a [`Sink`].
///
/// Every container must be handed back to [`Sink::finish_container`], also when writing one of
/// its items failed.
#[derive(Debug)]
#[must_use = "a container must be finished"]
pub struct Container {
    start: usize,
    items: usize,
    finished: bool,
}

impl Container {
    /// The number of items started so far.
    pub fn items(&self) -> usize {
        self.items
    }
}

impl Drop for Container {
    fn drop(&mut self) {
        debug_assert!(
            self.finished || std::thread::panicking(),
            "Container dropped without being finished"
        );
    }
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of bytes written so far.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The number of containers that are not finished yet.
    pub(crate) fn open_containers(&self) -> usize {
        self.open.len()
    }

    /// Drops everything written after the first `len` bytes, along with the containers
    /// opened beyond the first `open_containers`.
    pub(crate) fn truncate(&mut self, len: usize, open_containers: usize) {
        self.buffer.truncate(len);
        self.open.truncate(open_containers);
    }

    /// Returns the written bytes.
    pub fn into_inner(self) -> Vec<u8> {
        debug_assert!(self.open.is_empty(), "Unfinished containers: {:?}", self.open);
        self.buffer
    }

    pub fn write_boolean(&mut self, value: bool) {
        self.buffer.push(u8::from(value));
    }

    pub fn write_int(&mut self, value: i32) {
        zig_i32(value, &mut self.buffer);
    }

    pub fn write_long(&mut self, value: i64) {
        zig_i64(value, &mut self.buffer);
    }

    pub fn write_float(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_double(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a length prefixed sequence of bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        // slices never exceed isize::MAX bytes
        self.write_long(bytes.len() as i64);
        self.buffer.extend_from_slice(bytes);
    }

    pub fn write_string(&mut self, s: &str) {
        self.write_bytes(s.as_bytes());
    }

    /// Appends bytes without any framing.
    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Opens an array or a map. Its items are written right after this call.
    pub fn begin_container(&mut self) -> Container {
        let start = self.buffer.len();
        self.open.push(start);
        Container {
            start,
            items: 0,
            finished: false,
        }
    }

    /// Counts one more item of `container`, the item itself is written afterwards.
    pub fn start_item(&mut self, container: &mut Container) {
        debug_assert!(!container.finished, "Item started on a finished container");
        container.items += 1;
    }

    /// Closes `container`: its items become one block followed by the end marker.
    ///
    /// Containers are finished innermost first. Finishing a container twice does nothing.
    pub fn finish_container(&mut self, container: &mut Container) {
        if container.finished {
            return;
        }
        container.finished = true;

        let start = self.open.pop();
        debug_assert_eq!(start, Some(container.start), "Containers finished out of order");

        if container.items > 0 {
            let body = self.buffer.split_off(container.start);
            self.write_long(container.items as i64);
            self.buffer.extend_from_slice(&body);
        }
        self.buffer.push(0);
    }
}
