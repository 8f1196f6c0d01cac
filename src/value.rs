//! The value layer: how a production's matched arguments become a
//! user value, either through a plain callback or through a [`Sink`] that
//! accumulates repeated items before being finalized.
//!
//! Generalizes a `TokenValue`-style "one token -> one value" conversion
//! trait into "a stream of matched items -> one value", to cover
//! `list`/`opt_list`/`delimited` instead of just single-token productions.

use std::marker::PhantomData;

/// An incremental value builder: accepts items one at a time via
/// [`Sink::push`], then produces the final value via [`Sink::finish`].
pub trait Sink<Item> {
    type Output;

    fn push(&mut self, item: Item);

    fn finish(self) -> Self::Output;
}

/// A type that can produce a fresh [`Sink`] for a particular item type —
/// the unevaluated "sink" production member before `.sink()` is called on it.
pub trait IntoSink<Item> {
    type Sink: Sink<Item, Output = Self::Output>;
    type Output;

    fn sink(&self) -> Self::Sink;
}

/// Pushes matched items into any `C: Extend<T> + Default`, e.g. `Vec<T>`,
/// `VecDeque<T>`.
pub struct AsList<C>(PhantomData<C>);

impl<C> Default for AsList<C> {
    fn default() -> Self {
        AsList(PhantomData)
    }
}

pub struct AsListBuilder<T, C>(C, PhantomData<T>);

impl<T, C: Extend<T> + Default> Sink<T> for AsListBuilder<T, C> {
    type Output = C;

    fn push(&mut self, item: T) {
        self.0.extend(std::iter::once(item));
    }

    fn finish(self) -> Self::Output {
        self.0
    }
}

impl<T, C: Extend<T> + Default> IntoSink<T> for AsList<C> {
    type Sink = AsListBuilder<T, C>;
    type Output = C;

    fn sink(&self) -> Self::Sink {
        AsListBuilder(C::default(), PhantomData)
    }
}

/// Inserts matched items into any `C: Extend<T> + Default` that is
/// set/map-shaped rather than sequence-shaped; distinguished from
/// [`AsList`] only by name (both reduce to `Extend::extend`).
pub type AsCollection<C> = AsList<C>;

/// Appends matched fragments (code units, code points, or whole lexemes)
/// into a growable string-like target `S`. `Item` is whatever fragment type
/// the grammar feeds it (`u8`, `char`, `&str`, ...); `S` just needs
/// `Extend<Item>`.
pub struct AsString<S>(PhantomData<S>);

impl<S> Default for AsString<S> {
    fn default() -> Self {
        AsString(PhantomData)
    }
}

pub struct AsStringBuilder<Item, S>(S, PhantomData<Item>);

impl<Item, S: Extend<Item> + Default> Sink<Item> for AsStringBuilder<Item, S> {
    type Output = S;

    fn push(&mut self, item: Item) {
        self.0.extend(std::iter::once(item));
    }

    fn finish(self) -> Self::Output {
        self.0
    }
}

impl<Item, S: Extend<Item> + Default> IntoSink<Item> for AsString<S> {
    type Sink = AsStringBuilder<Item, S>;
    type Output = S;

    fn sink(&self) -> Self::Sink {
        AsStringBuilder(S::default(), PhantomData)
    }
}

/// Feeds every matched item through a user callback and collects its
/// returns, e.g. `collect::<Vec<_>>(|tok| tok.as_str().to_owned())`.
pub struct Collect<F, Out> {
    callback: F,
    _out: PhantomData<Out>,
}

impl<F, Out> Collect<F, Out> {
    pub fn new(callback: F) -> Self {
        Collect { callback, _out: PhantomData }
    }
}

pub struct CollectBuilder<F, Item, R, Out>
where
    F: Fn(Item) -> R,
    Out: Extend<R> + Default,
{
    callback: F,
    items: Out,
    _marker: PhantomData<Item>,
}

impl<F, Item, R, Out> Sink<Item> for CollectBuilder<F, Item, R, Out>
where
    F: Fn(Item) -> R,
    Out: Extend<R> + Default,
{
    type Output = Out;

    fn push(&mut self, item: Item) {
        self.items.extend(std::iter::once((self.callback)(item)));
    }

    fn finish(self) -> Self::Output {
        self.items
    }
}

impl<F, Item, R, Out> IntoSink<Item> for Collect<F, Out>
where
    F: Fn(Item) -> R + Clone,
    Out: Extend<R> + Default,
{
    type Sink = CollectBuilder<F, Item, R, Out>;
    type Output = Out;

    fn sink(&self) -> Self::Sink {
        CollectBuilder { callback: self.callback.clone(), items: Out::default(), _marker: PhantomData }
    }
}

/// Discards every matched item, keeping only how many there were.
#[derive(Default)]
pub struct Count;

pub struct CountBuilder(u64);

impl<Item> Sink<Item> for CountBuilder {
    type Output = u64;

    fn push(&mut self, _item: Item) {
        self.0 += 1;
    }

    fn finish(self) -> Self::Output {
        self.0
    }
}

impl<Item> IntoSink<Item> for Count {
    type Sink = CountBuilder;
    type Output = u64;

    fn sink(&self) -> Self::Sink {
        CountBuilder(0)
    }
}

/// Composes a sink with a callback applied to the sink's finished value,
/// written `sink >> cb`.
pub struct SinkThen<S, F> {
    sink: S,
    then: F,
}

impl<S, F> SinkThen<S, F> {
    pub fn new(sink: S, then: F) -> Self {
        SinkThen { sink, then }
    }
}

impl<Item, S, F, R> IntoSink<Item> for SinkThen<S, F>
where
    S: IntoSink<Item>,
    F: Fn(S::Output) -> R + Clone,
{
    type Sink = ThenBuilder<S::Sink, F>;
    type Output = R;

    fn sink(&self) -> Self::Sink {
        ThenBuilder { inner: self.sink.sink(), then: self.then.clone() }
    }
}

pub struct ThenBuilder<B, F> {
    inner: B,
    then: F,
}

impl<Item, B, F, R> Sink<Item> for ThenBuilder<B, F>
where
    B: Sink<Item>,
    F: Fn(B::Output) -> R,
{
    type Output = R;

    fn push(&mut self, item: Item) {
        self.inner.push(item);
    }

    fn finish(self) -> Self::Output {
        (self.then)(self.inner.finish())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn as_list_collects_pushed_items() {
        let sink: AsList<Vec<i32>> = AsList::default();
        let mut builder = sink.sink();
        builder.push(1);
        builder.push(2);
        builder.push(3);
        assert_eq!(builder.finish(), vec![1, 2, 3]);
    }

    #[test]
    fn count_ignores_item_values() {
        let sink = Count;
        let mut builder = IntoSink::<&str>::sink(&sink);
        builder.push("a");
        builder.push("bb");
        assert_eq!(builder.finish(), 2);
    }

    #[test]
    fn collect_applies_callback_per_item() {
        let sink: Collect<_, Vec<usize>> = Collect::new(|s: &str| s.len());
        let mut builder = sink.sink();
        builder.push("a");
        builder.push("bb");
        assert_eq!(builder.finish(), vec![1, 2]);
    }

    #[test]
    fn sink_then_transforms_finished_value() {
        let sink = SinkThen::new(Count, |n: u64| n * 2);
        let mut builder = IntoSink::<char>::sink(&sink);
        builder.push('a');
        builder.push('b');
        assert_eq!(builder.finish(), 4);
    }
}
