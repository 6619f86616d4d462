#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

use allocator_api2::alloc::AllocError;
use allocator_api2::alloc::Allocator;
use allocator_api2::alloc::Global;
use core::alloc::Layout;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ptr::NonNull;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// SUBMODULES                                                                 //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

mod ptr;

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// PUBLIC TYPE AND TRAIT DEFINITIONS                                          //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

/// A singly-linked list of `T`s with a tail pointer for constant-time
/// append.
///
/// The list is append-only. Values are visited in insertion order by
/// [`iter`](Self::iter), and the whole chain is released when the list
/// is dropped. Nodes are allocated from `A`, which defaults to the
/// global allocator.

pub struct List<T, A: Allocator = Global> {
  head: Option<NonNull<Node<T>>>,
  tail: Option<NonNull<Node<T>>>,
  len: usize,
  allocator: A,
  marker: PhantomData<T>,
}

unsafe impl<T, A: Allocator> Send for List<T, A> where T: Send, A: Send { }

unsafe impl<T, A: Allocator> Sync for List<T, A> where T: Sync, A: Sync { }

/// An iterator over the values of a [`List`], from head to tail.

pub struct Iter<'a, T> {
  node: Option<NonNull<Node<T>>>,
  len: usize,
  marker: PhantomData<&'a Node<T>>,
}

unsafe impl<'a, T> Send for Iter<'a, T> where T: Sync { }

unsafe impl<'a, T> Sync for Iter<'a, T> where T: Sync { }

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// PRIVATE TYPE AND TRAIT DEFINITIONS                                         //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

// Each node exclusively owns its successor, so the chain from `head`
// to `tail` is a single-owner structure with no cycles.

struct Node<T> {
  next: Option<NonNull<Node<T>>>,
  value: T,
}

enum Panicked { }

trait Fail: Sized {
  fn fail<T>(_: Layout) -> Result<T, Self>;
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// UTILITY FUNCTIONS                                                          //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

#[inline(always)]
fn unwrap<T>(x: Result<T, Panicked>) -> T {
  match x { Ok(x) => x, Err(e) => match e { } }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Fail                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl Fail for Panicked {
  #[inline(never)]
  #[cold]
  fn fail<T>(layout: Layout) -> Result<T, Self> {
    // A node allocation failed. The list cannot proceed without the
    // memory it needs, so follow the global allocator's fatal-error
    // convention.
    alloc::alloc::handle_alloc_error(layout)
  }
}

impl Fail for AllocError {
  #[inline(always)]
  fn fail<T>(_: Layout) -> Result<T, Self> {
    Err(AllocError)
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// List                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

#[inline(always)]
fn push_back<T, A, E>(list: &mut List<T, A>, value: T) -> Result<(), E>
where
  A: Allocator,
  E: Fail,
{
  let layout = Layout::new::<Node<T>>();

  let Ok(p) = list.allocator.allocate(layout) else {
    return E::fail(layout);
  };

  let p = ptr::cast::<_, Node<T>>(p);

  unsafe { ptr::write(p, Node { next: None, value }) };

  match list.tail {
    None => list.head = Some(p),
    Some(t) => unsafe { ptr::as_mut_ref(t) }.next = Some(p),
  }

  list.tail = Some(p);
  list.len = list.len + 1;

  Ok(())
}

impl<T> List<T> {
  /// Creates an empty list backed by the global allocator.

  #[inline(always)]
  pub const fn new() -> Self {
    Self {
      head: None,
      tail: None,
      len: 0,
      allocator: Global,
      marker: PhantomData,
    }
  }
}

impl<T, A: Allocator> List<T, A> {
  /// Creates an empty list backed by the given allocator.

  #[inline(always)]
  pub const fn new_in(allocator: A) -> Self {
    Self {
      head: None,
      tail: None,
      len: 0,
      allocator,
      marker: PhantomData,
    }
  }

  /// The number of values in the list.

  #[inline(always)]
  pub fn len(&self) -> usize {
    self.len
  }

  /// Whether the list holds no values.

  #[inline(always)]
  pub fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  /// A reference to the first value, if any.

  #[inline(always)]
  pub fn front(&self) -> Option<&T> {
    let p = self.head?;
    Some(&unsafe { ptr::as_ref(p) }.value)
  }

  /// A reference to the last value, if any.

  #[inline(always)]
  pub fn back(&self) -> Option<&T> {
    let p = self.tail?;
    Some(&unsafe { ptr::as_ref(p) }.value)
  }

  /// A reference to the backing allocator.

  #[inline(always)]
  pub fn allocator(&self) -> &A {
    &self.allocator
  }

  /// Appends a value after the current tail.
  ///
  /// References obtained from the list before the call remain valid;
  /// only the former tail's link changes.
  ///
  /// # Panics
  ///
  /// Panics on failure to allocate memory.

  #[inline(always)]
  pub fn push_back(&mut self, value: T) {
    unwrap(push_back(self, value))
  }

  /// Appends a value after the current tail.
  ///
  /// # Errors
  ///
  /// An error is returned on failure to allocate memory. The list is
  /// unchanged and the value is dropped.

  #[inline(always)]
  pub fn try_push_back(&mut self, value: T) -> Result<(), AllocError> {
    push_back(self, value)
  }

  /// An iterator over the values from head to tail, in insertion
  /// order. Each call starts a fresh traversal.

  #[inline(always)]
  pub fn iter(&self) -> Iter<'_, T> {
    Iter {
      node: self.head,
      len: self.len,
      marker: PhantomData,
    }
  }
}

impl<T> Default for List<T> {
  #[inline(always)]
  fn default() -> Self {
    Self::new()
  }
}

impl<T, A: Allocator> Extend<T> for List<T, A> {
  fn extend<I>(&mut self, iter: I)
  where
    I: IntoIterator<Item = T>
  {
    for value in iter {
      self.push_back(value);
    }
  }
}

impl<T> FromIterator<T> for List<T> {
  fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = T>
  {
    let mut list = Self::new();
    list.extend(iter);
    list
  }
}

impl<'a, T, A: Allocator> IntoIterator for &'a List<T, A> {
  type Item = &'a T;
  type IntoIter = Iter<'a, T>;

  #[inline(always)]
  fn into_iter(self) -> Iter<'a, T> {
    self.iter()
  }
}

impl<T, A: Allocator> Drop for List<T, A> {
  fn drop(&mut self) {
    let layout = Layout::new::<Node<T>>();

    let mut node = self.head.take();
    self.tail = None;
    self.len = 0;

    while let Some(p) = node {
      let x = unsafe { ptr::read(p) };
      node = x.next;
      drop::<T>(x.value);
      unsafe { self.allocator.deallocate(ptr::cast(p), layout) };
    }
  }
}

impl<T, A: Allocator> fmt::Debug for List<T, A>
where
  T: fmt::Debug
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

////////////////////////////////////////////////////////////////////////////////
//                                                                            //
// Iter                                                                       //
//                                                                            //
////////////////////////////////////////////////////////////////////////////////

impl<'a, T> Iterator for Iter<'a, T> {
  type Item = &'a T;

  #[inline(always)]
  fn next(&mut self) -> Option<&'a T> {
    let p = self.node?;
    let x = unsafe { ptr::as_ref(p) };
    self.node = x.next;
    self.len = self.len - 1;
    Some(&x.value)
  }

  #[inline(always)]
  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.len, Some(self.len))
  }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> { }

impl<'a, T> FusedIterator for Iter<'a, T> { }

impl<'a, T> Clone for Iter<'a, T> {
  #[inline(always)]
  fn clone(&self) -> Self {
    Iter {
      node: self.node,
      len: self.len,
      marker: PhantomData,
    }
  }
}

impl<'a, T> fmt::Debug for Iter<'a, T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("Iter").field(&self.len).finish()
  }
}
