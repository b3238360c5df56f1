//! Adjacent-pair traversal used by range validation and containment.

/// Iterator over adjacent pairs of another iterator.
///
/// A sequence of `n >= 2` items yields the `n - 1` pairs `(a, Some(b))`, `(b, Some(c))`, ...
/// A single item yields one pair `(a, None)`, and an empty sequence yields nothing.
pub struct Pairwise<I: Iterator> {
    iter: I,
    current: Option<I::Item>,
    started: bool,
}

/// Creates a [`Pairwise`] iterator over `iterable`.
pub fn pairwise<I>(iterable: I) -> Pairwise<I::IntoIter>
where
    I: IntoIterator,
    I::Item: Clone,
{
    Pairwise {
        iter: iterable.into_iter(),
        current: None,
        started: false,
    }
}

impl<I> Iterator for Pairwise<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = (I::Item, Option<I::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            let left = self.iter.next()?;
            let right = self.iter.next();
            self.current = right.clone();
            return Some((left, right));
        }

        let left = self.current.take()?;
        let right = self.iter.next()?;
        self.current = Some(right.clone());
        Some((left, Some(right)))
    }
}
