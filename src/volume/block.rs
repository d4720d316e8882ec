//! Dense 3D blocks and 2D cross-sections of voxel data

use std::ops::Index;

use rayon::prelude::*;

use crate::math::axis::Axis;

/// Dense 3D array with shape `[nx, ny, nz]`, stored x-fastest
#[derive(Clone, Debug, PartialEq)]
pub struct Block<T> {
    shape: [usize; 3],
    data: Vec<T>,
}

impl<T> Block<T> {
    /// Wrap existing data. Returns `None` if `data.len()` does not match `shape`.
    pub fn from_vec(shape: [usize; 3], data: Vec<T>) -> Option<Self> {
        (data.len() == shape.iter().product::<usize>()).then_some(Self { shape, data })
    }

    /// Build a block by evaluating `f(x, y, z)` for every voxel
    pub fn from_fn(shape: [usize; 3], mut f: impl FnMut(usize, usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(shape.iter().product());
        for z in 0..shape[2] {
            for y in 0..shape[1] {
                for x in 0..shape[0] {
                    data.push(f(x, y, z));
                }
            }
        }
        Self { shape, data }
    }

    /// `[nx, ny, nz]`
    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    /// Number of voxels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether any axis has zero extent
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Voxels in x-fastest order
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Linear index of voxel `(x, y, z)`
    #[inline]
    pub fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.shape[0] * (y + self.shape[1] * z)
    }

    /// Voxel at `(x, y, z)`, or `None` out of bounds
    pub fn get(&self, x: usize, y: usize, z: usize) -> Option<&T> {
        if x < self.shape[0] && y < self.shape[1] && z < self.shape[2] {
            self.data.get(self.offset(x, y, z))
        } else {
            None
        }
    }

    /// Map every voxel in layout order, preserving shape
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Block<U> {
        Block {
            shape: self.shape,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Number of cross-sections along `axis`
    pub fn depth(&self, axis: Axis) -> usize {
        self.shape[axis.index()]
    }
}

impl<T: Clone> Block<T> {
    /// Block with every voxel set to `value`
    pub fn filled(shape: [usize; 3], value: T) -> Self {
        Self { shape, data: vec![value; shape.iter().product()] }
    }
}

impl<T: Copy> Block<T> {
    /// Copy the cross-section at local index `index` along `axis`.
    ///
    /// In-plane axes follow [`Axis::plane_axes`]: slicing along z yields an
    /// (x, y) image, along y an (x, z) image, along x a (y, z) image.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds along `axis`.
    pub fn slice(&self, axis: Axis, index: usize) -> Slice2<T> {
        assert!(index < self.depth(axis), "slice {index} out of bounds along {axis}");
        let [nx, ny, nz] = self.shape;
        match axis {
            Axis::Z => {
                let start = self.offset(0, 0, index);
                Slice2 { width: nx, height: ny, data: self.data[start..start + nx * ny].to_vec() }
            }
            Axis::Y => {
                let mut data = Vec::with_capacity(nx * nz);
                for z in 0..nz {
                    let start = self.offset(0, index, z);
                    data.extend_from_slice(&self.data[start..start + nx]);
                }
                Slice2 { width: nx, height: nz, data }
            }
            Axis::X => {
                let mut data = Vec::with_capacity(ny * nz);
                for z in 0..nz {
                    for y in 0..ny {
                        data.push(self.data[self.offset(index, y, z)]);
                    }
                }
                Slice2 { width: ny, height: nz, data }
            }
        }
    }
}

impl<T: Sync> Block<T> {
    /// Map every voxel in parallel, preserving layout
    pub fn par_map<U: Send>(&self, f: impl Fn(&T) -> U + Sync + Send) -> Block<U> {
        Block {
            shape: self.shape,
            data: self.data.par_iter().map(f).collect(),
        }
    }
}

impl<T> Index<[usize; 3]> for Block<T> {
    type Output = T;

    fn index(&self, [x, y, z]: [usize; 3]) -> &T {
        &self.data[self.offset(x, y, z)]
    }
}

/// Dense 2D cross-section, stored row-major (u fastest)
#[derive(Clone, Debug, PartialEq)]
pub struct Slice2<T> {
    pub width: usize,
    pub height: usize,
    pub data: Vec<T>,
}

impl<T: Copy> Slice2<T> {
    /// Value at in-plane position `(u, v)`
    pub fn get(&self, u: usize, v: usize) -> Option<T> {
        (u < self.width && v < self.height).then(|| self.data[u + self.width * v])
    }

    /// Map every pixel, preserving shape
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> Slice2<U> {
        Slice2 {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}
