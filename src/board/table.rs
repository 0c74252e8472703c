/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ops::{Index, IndexMut};

use super::Square;

/// A generic container of 64 elements, indexed by [`Square`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Table<T>([T; Square::COUNT]);

impl<T> Table<T> {
    /// Create a new [`Table`] by applying `f` to each [`Square`].
    #[inline(always)]
    pub fn from_fn<F>(mut f: F) -> Self
    where
        F: FnMut(Square) -> T,
    {
        Self(std::array::from_fn(|i| f(Square::from_index_unchecked(i))))
    }

    /// Create a new [`Table`] by applying a fallible `f` to each [`Square`], in ascending order.
    ///
    /// Stops at, and returns, the first error produced by `f`.
    pub fn try_from_fn<F, E>(mut f: F) -> Result<Self, E>
    where
        F: FnMut(Square) -> Result<T, E>,
    {
        let mut values = Vec::with_capacity(Square::COUNT);
        for square in Square::iter() {
            values.push(f(square)?);
        }

        match values.try_into() {
            Ok(values) => Ok(Self(values)),
            Err(_) => unreachable!("Square::iter yields exactly {} squares", Square::COUNT),
        }
    }

    /// Create a new [`Table`] with the provided values.
    #[inline(always)]
    pub const fn new(values: [T; Square::COUNT]) -> Self {
        Self(values)
    }

    /// Create a new [`Table`] with every value set to `value`.
    #[inline(always)]
    pub const fn splat(value: T) -> Self
    where
        T: Copy,
    {
        Self([value; Square::COUNT])
    }

    /// Get the value of this [`Table`] at the index of `square`.
    #[inline(always)]
    pub const fn get(&self, square: Square) -> &T {
        &self.0[square.index()]
    }

    /// Set the value of this [`Table`] at the index of `square`.
    #[inline(always)]
    pub fn set(&mut self, square: Square, value: T) {
        self.0[square] = value;
    }

    /// An iterator over every value, in [`Square`] order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> {
        self.0.iter()
    }
}

impl<T> Default for Table<T>
where
    T: Default + Copy,
{
    #[inline(always)]
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T, Idx> Index<Idx> for Table<T>
where
    [T; Square::COUNT]: Index<Idx, Output = T>,
{
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Idx) -> &Self::Output {
        &self.0[index]
    }
}

impl<T, Idx> IndexMut<Idx> for Table<T>
where
    [T; Square::COUNT]: IndexMut<Idx, Output = T>,
{
    #[inline(always)]
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        &mut self.0[index]
    }
}
