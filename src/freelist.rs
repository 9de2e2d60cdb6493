//
// Copyright 2022-Present (c) Raja Lehtihet & Wael El Oraiby
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions are met:
//
// 1. Redistributions of source code must retain the above copyright notice,
// this list of conditions and the following disclaimer.
//
// 2. Redistributions in binary form must reproduce the above copyright notice,
// this list of conditions and the following disclaimer in the documentation
// and/or other materials provided with the distribution.
//
// 3. Neither the name of the copyright holder nor the names of its contributors
// may be used to endorse or promote products derived from this software without
// specific prior written permission.
//
// THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
// AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE
// LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR
// CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF
// SUBSTITUTE GOODS OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS
// INTERRUPTION) HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN
// CONTRACT, STRICT LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE)
// ARISING IN ANY WAY OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE
// POSSIBILITY OF SUCH DAMAGE.
//
use log::trace;

const NONE: u32 = u32::MAX;

/// Handle to a node inside a [`FreeList`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FreeListNodeId(u32);

/// One allocation node: an offset/size pair linked into the sorted free list
/// while the range is available.
#[derive(Copy, Clone, Debug)]
struct FreeListNode {
    offset: u64,
    size: u64,
    prev: u32,
    next: u32,
}

/// Best-fit freelist allocator over an abstract `[0, total_size)` range, used
/// by GPU resource managers to sub-allocate buffers.
///
/// The node pool is preallocated (`total_size / min_node_size` slots) and
/// linked with indices; a free-slot stack hands out and retires node slots in
/// O(1). The free list is kept sorted by offset and adjacent free nodes are
/// coalesced when a node is returned.
pub struct FreeList {
    total_size: u64,
    used_space: u64,
    min_node_size: u64,
    nodes: Vec<FreeListNode>,
    free_slots: Vec<u32>,
    // index of the first free node, NONE when everything is allocated
    head: u32,
}

impl FreeList {
    /// Creates a freelist covering `[0, total_size)`. No free block smaller
    /// than `min_node_size` is ever created by splitting.
    pub fn new(total_size: u64, min_node_size: u64) -> Self {
        assert!(min_node_size > 0 && total_size >= min_node_size);

        let max_nodes = (total_size / min_node_size) as u32;
        let nodes = vec![FreeListNode { offset: 0, size: 0, prev: NONE, next: NONE }; max_nodes as usize];
        // hand slots out from the top so slot 0 goes first
        let free_slots: Vec<u32> = (0..max_nodes).rev().collect();

        let mut list = Self {
            total_size,
            used_space: 0,
            min_node_size,
            nodes,
            free_slots,
            head: NONE,
        };

        let first = list.free_slots.pop().expect("node pool is never empty at creation");
        list.nodes[first as usize] = FreeListNode { offset: 0, size: total_size, prev: NONE, next: NONE };
        list.head = first;
        list
    }

    /// Total managed size.
    pub fn total_size(&self) -> u64 { self.total_size }

    /// Bytes currently allocated.
    pub fn used_space(&self) -> u64 { self.used_space }

    /// Offset and size of an allocated node.
    pub fn node(&self, id: FreeListNodeId) -> (u64, u64) {
        let node = &self.nodes[id.0 as usize];
        (node.offset, node.size)
    }

    /// Allocates `size` bytes from the free block with the least slack.
    /// Returns `None` when no free block can satisfy the request.
    pub fn get_node(&mut self, size: u64) -> Option<FreeListNodeId> {
        // best fit: smallest non-negative slack, first encountered wins ties
        let mut best = NONE;
        let mut smallest_diff = u64::MAX;
        let mut current = self.head;
        while current != NONE {
            let node = &self.nodes[current as usize];
            if node.size >= size && node.size - size < smallest_diff {
                best = current;
                smallest_diff = node.size - size;
            }
            current = node.next;
        }

        if best == NONE {
            trace!("freelist exhausted: {} requested, {} free", size, self.total_size - self.used_space);
            return None;
        }

        // split when the remainder still makes a useful block
        if smallest_diff >= self.min_node_size {
            let slot = self.free_slots.pop().expect("node pool sized for worst-case splits");
            let (offset, next) = {
                let node = &mut self.nodes[best as usize];
                node.size = size;
                (node.offset + size, node.next)
            };
            self.nodes[slot as usize] = FreeListNode { offset, size: smallest_diff, prev: best, next };
            if next != NONE {
                self.nodes[next as usize].prev = slot;
            }
            self.nodes[best as usize].next = slot;
        }

        self.used_space += self.nodes[best as usize].size;
        self.unlink(best);
        Some(FreeListNodeId(best))
    }

    /// Returns a node to the free list, coalescing with adjacent free blocks.
    pub fn return_node(&mut self, id: FreeListNodeId) {
        let index = id.0;
        self.used_space -= self.nodes[index as usize].size;

        // find the first free node past the returned offset and insert before it
        let offset = self.nodes[index as usize].offset;
        let mut after = self.head;
        let mut before = NONE;
        while after != NONE && self.nodes[after as usize].offset <= offset {
            before = after;
            after = self.nodes[after as usize].next;
        }

        self.nodes[index as usize].prev = before;
        self.nodes[index as usize].next = after;
        if before != NONE {
            self.nodes[before as usize].next = index;
        } else {
            self.head = index;
        }
        if after != NONE {
            self.nodes[after as usize].prev = index;
        }

        // coalesce left
        let mut merged = index;
        if before != NONE {
            let left = &self.nodes[before as usize];
            if left.offset + left.size == self.nodes[index as usize].offset {
                let grow = self.nodes[index as usize].size;
                self.nodes[before as usize].size += grow;
                self.unlink(index);
                self.retire_slot(index);
                merged = before;
            }
        }

        // coalesce right
        let next = self.nodes[merged as usize].next;
        if next != NONE {
            let end = self.nodes[merged as usize].offset + self.nodes[merged as usize].size;
            if end == self.nodes[next as usize].offset {
                let grow = self.nodes[next as usize].size;
                self.nodes[merged as usize].size += grow;
                self.unlink(next);
                self.retire_slot(next);
            }
        }
    }

    fn unlink(&mut self, index: u32) {
        let (prev, next) = {
            let node = &self.nodes[index as usize];
            (node.prev, node.next)
        };
        if prev != NONE {
            self.nodes[prev as usize].next = next;
        } else if self.head == index {
            self.head = next;
        }
        if next != NONE {
            self.nodes[next as usize].prev = prev;
        }
        self.nodes[index as usize].prev = NONE;
        self.nodes[index as usize].next = NONE;
    }

    fn retire_slot(&mut self, index: u32) {
        self.nodes[index as usize].offset = 0;
        self.nodes[index as usize].size = 0;
        self.free_slots.push(index);
    }

    /// Free ranges in offset order, mainly for diagnostics and tests.
    pub fn free_ranges(&self) -> Vec<(u64, u64)> {
        let mut ranges = Vec::new();
        let mut current = self.head;
        while current != NONE {
            let node = &self.nodes[current as usize];
            ranges.push((node.offset, node.size));
            current = node.next;
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_invariants(list: &FreeList) {
        let ranges = list.free_ranges();
        let free_total: u64 = ranges.iter().map(|(_, size)| size).sum();
        assert_eq!(list.used_space() + free_total, list.total_size());
        for window in ranges.windows(2) {
            let (a_off, a_size) = window[0];
            let (b_off, _) = window[1];
            assert!(a_off < b_off, "free list out of order");
            assert!(a_off + a_size < b_off, "adjacent free nodes must be coalesced");
        }
    }

    #[test]
    fn round_trip_with_coalescing() {
        let mut list = FreeList::new(1024, 32);

        let a = list.get_node(200).expect("fits");
        let b = list.get_node(400).expect("fits");
        let c = list.get_node(100).expect("fits");
        assert_eq!(list.node(a).0, 0);
        assert_eq!(list.node(b).0, 200);
        assert_eq!(list.node(c).0, 600);
        assert_eq!(list.used_space(), 700);
        check_invariants(&list);

        // middle first: not adjacent to the tail block, no coalescing
        list.return_node(b);
        assert_eq!(list.used_space(), 300);
        assert_eq!(list.free_ranges(), vec![(200, 400), (700, 324)]);

        list.return_node(a);
        assert_eq!(list.free_ranges(), vec![(0, 600), (700, 324)]);
        check_invariants(&list);

        list.return_node(c);
        assert_eq!(list.free_ranges(), vec![(0, 1024)]);
        assert_eq!(list.used_space(), 0);
    }

    #[test]
    fn best_fit_prefers_least_slack() {
        let mut list = FreeList::new(1024, 16);
        let a = list.get_node(100).unwrap();
        let b = list.get_node(200).unwrap();
        let _c = list.get_node(100).unwrap();
        list.return_node(a); // hole of 100 at 0
        list.return_node(b); // hole of 200 at 100 -> coalesces to 300 at 0
        assert_eq!(list.free_ranges()[0], (0, 300));

        // tail block is bigger; the 300-byte hole is the best fit
        let d = list.get_node(300).unwrap();
        assert_eq!(list.node(d).0, 0);
        check_invariants(&list);
    }

    #[test]
    fn split_respects_min_node_size() {
        let mut list = FreeList::new(128, 32);
        // remainder of 16 < min node size: the whole block is handed out
        let a = list.get_node(112).unwrap();
        assert_eq!(list.node(a).1, 128);
        assert_eq!(list.used_space(), 128);
        assert!(list.get_node(1).is_none());
        list.return_node(a);
        assert_eq!(list.free_ranges(), vec![(0, 128)]);
    }

    #[test]
    fn exhaustion_returns_none() {
        let mut list = FreeList::new(256, 32);
        assert!(list.get_node(512).is_none());
        let _a = list.get_node(256).unwrap();
        assert!(list.get_node(32).is_none());
    }

    #[test]
    fn interleaved_get_return_keeps_accounting() {
        let mut list = FreeList::new(4096, 64);
        let mut held = Vec::new();
        for i in 0..8 {
            held.push(list.get_node(128 + i * 64).unwrap());
        }
        check_invariants(&list);
        for id in held.drain(..) {
            list.return_node(id);
            check_invariants(&list);
        }
        assert_eq!(list.used_space(), 0);
        assert_eq!(list.free_ranges(), vec![(0, 4096)]);
    }
}
