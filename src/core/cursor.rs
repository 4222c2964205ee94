/// Forward-only cursor over a slice with lookahead.
#[derive(Debug, Clone)]
pub struct Cursor<'a, T> {
    items: &'a [T],
    pos: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.items.len());
    }

    pub fn peek(&self) -> Option<&'a T> {
        self.items.get(self.pos)
    }

    pub fn next(&mut self) -> Option<&'a T> {
        let item = self.items.get(self.pos)?;
        self.pos += 1;
        Some(item)
    }

    /// Folds following items into `acc` for as long as `step` accepts them.
    ///
    /// The first rejected item is left unconsumed and the last accepted
    /// accumulator is returned.
    pub fn extend_while<A>(&mut self, mut acc: A, mut step: impl FnMut(&A, &'a T) -> Option<A>) -> A {
        while let Some(item) = self.peek() {
            match step(&acc, item) {
                Some(next) => {
                    acc = next;
                    self.pos += 1;
                }
                None => break,
            }
        }
        acc
    }

    /// Appends following items to `seed` until `done` holds, consuming them.
    ///
    /// Returns `None` and restores the position when the items run out first.
    pub fn accumulate_until(
        &mut self,
        seed: String,
        mut piece: impl FnMut(&'a T) -> String,
        mut done: impl FnMut(&str) -> bool,
    ) -> Option<String> {
        let start = self.pos;
        let mut text = seed;
        while !done(&text) {
            match self.next() {
                Some(item) => text.push_str(&piece(item)),
                None => {
                    self.pos = start;
                    return None;
                }
            }
        }
        Some(text)
    }
}
