use crate::util::lines::LineIndex;

pub mod error;
pub mod tree;

pub struct Context<'src> {
    pub lines: &'src LineIndex,
}

/// Analogous to [`std::fmt::Display`], but also contains the program context,
/// such as the source's [`LineIndex`].
pub trait Show {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &Context<'_>) -> std::fmt::Result;

    /// Returns a type which can be displayed.
    fn display<'a>(&'a self, ctx: &'a Context<'_>) -> impl std::fmt::Display + 'a
    where
        Self: Sized,
    {
        Display(self, ctx)
    }
}

struct Display<'this, 'ctx, 'src, T: Show>(&'this T, &'ctx Context<'src>);

impl<T> std::fmt::Display for Display<'_, '_, '_, T>
where
    T: Show,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Display(this, ctx) = self;
        this.show(f, ctx)
    }
}
