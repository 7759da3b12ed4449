use crate::pos::Pos;
use std::collections::VecDeque;

/// Occupied cells, head first.
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<Pos>,
}

impl Snake {
    pub fn new(head: Pos) -> Self {
        let mut body = VecDeque::new();
        body.push_back(head);
        Self { body }
    }

    pub fn head(&self) -> Pos {
        // never empty: constructed with a head and only shrunk after a grow
        self.body[0]
    }

    pub fn tail(&self) -> Pos {
        self.body[self.body.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.body.iter().any(|&s| s == p)
    }

    /// Whether `p` hits a segment behind the head. The tail still counts even if it is about to move.
    pub fn body_hits(&self, p: Pos) -> bool {
        self.body.iter().skip(1).any(|&s| s == p)
    }

    pub fn push_head(&mut self, p: Pos) {
        self.body.push_front(p);
    }

    pub fn drop_tail(&mut self) -> Option<Pos> {
        if self.body.len() > 1 { self.body.pop_back() } else { None }
    }

    pub fn iter(&self) -> impl Iterator<Item = Pos> + '_ {
        self.body.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<Pos> {
        self.iter().collect()
    }

    pub fn get(&self, i: usize) -> Option<Pos> {
        self.body.get(i).copied()
    }

    #[cfg(test)]
    pub fn from_cells(cells: &[Pos]) -> Self {
        assert!(!cells.is_empty(), "snake needs a head");
        Self { body: cells.iter().copied().collect() }
    }
}
