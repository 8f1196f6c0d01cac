//! `list`/`opt_list`: a repetition of items separated by a
//! delimiter, with configurable trailing-separator tolerance.

use crate::context::Context;
use crate::encoding::Encoding;
use crate::engine::{Branch, BranchRule, Failed, ParseResult, Rule};
use crate::handler::Handler;
use crate::reader::Reader;

/// Whether a trailing separator (with nothing after it) is tolerated.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum TrailingSep {
    Forbidden,
    Allowed,
}

/// One or more `Item`s separated by `Sep`.
pub struct List<Item, Sep> {
    item: Item,
    sep: Sep,
    trailing: TrailingSep,
}

pub fn list<Item, Sep>(item: Item, sep: Sep) -> List<Item, Sep> {
    List { item, sep, trailing: TrailingSep::Forbidden }
}

impl<Item, Sep> List<Item, Sep> {
    pub fn trailing_sep(mut self, allowed: bool) -> Self {
        self.trailing = if allowed { TrailingSep::Allowed } else { TrailingSep::Forbidden };
        self
    }
}

impl<E, Item, Sep> List<Item, Sep>
where
    E: Encoding,
    Item: BranchRule<E>,
    Sep: BranchRule<E>,
{
    fn continue_with<H: Handler>(
        &self,
        ctx: &mut Context<'_, H, E>,
        reader: &mut Reader<'_, E>,
        out: &mut Vec<Item::Output>,
    ) -> ParseResult<()> {
        loop {
            match self.sep.try_parse(ctx, reader) {
                Branch::Backtracked => return Ok(()),
                Branch::Failed => return Err(Failed),
                Branch::Taken(_) => {}
            }
            match self.item.try_parse(ctx, reader) {
                Branch::Taken(v) => out.push(v),
                Branch::Failed => return Err(Failed),
                Branch::Backtracked => {
                    if self.trailing == TrailingSep::Allowed {
                        return Ok(());
                    }
                    return Err(Failed);
                }
            }
        }
    }
}

impl<E, Item, Sep> Rule<E> for List<Item, Sep>
where
    E: Encoding,
    Item: BranchRule<E>,
    Sep: BranchRule<E>,
{
    type Output = Vec<Item::Output>;
    const IS_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        let first = self.item.parse(ctx, reader)?;
        let mut out = vec![first];
        self.continue_with(ctx, reader, &mut out)?;
        Ok(out)
    }
}

impl<E, Item, Sep> BranchRule<E> for List<Item, Sep>
where
    E: Encoding,
    Item: BranchRule<E>,
    Sep: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.item.try_parse(ctx, reader) {
            Branch::Taken(first) => {
                let mut out = vec![first];
                match self.continue_with(ctx, reader, &mut out) {
                    Ok(()) => Branch::Taken(out),
                    Err(_) => Branch::Failed,
                }
            }
            Branch::Backtracked => Branch::Backtracked,
            Branch::Failed => Branch::Failed,
        }
    }
}

/// A `List` that's allowed to match zero items, yielding an empty `Vec`
/// rather than backtracking or failing.
pub struct OptList<Item, Sep>(List<Item, Sep>);

pub fn opt_list<Item, Sep>(item: Item, sep: Sep) -> OptList<Item, Sep> {
    OptList(list(item, sep))
}

impl<Item, Sep> OptList<Item, Sep> {
    pub fn trailing_sep(mut self, allowed: bool) -> Self {
        self.0 = self.0.trailing_sep(allowed);
        self
    }
}

impl<E, Item, Sep> Rule<E> for OptList<Item, Sep>
where
    E: Encoding,
    Item: BranchRule<E>,
    Sep: BranchRule<E>,
{
    type Output = Vec<Item::Output>;
    const IS_BRANCH: bool = true;
    const IS_UNCONDITIONAL_BRANCH: bool = true;

    fn parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> ParseResult<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(v) => Ok(v),
            Branch::Backtracked => Ok(Vec::new()),
            Branch::Failed => Err(Failed),
        }
    }
}

impl<E, Item, Sep> BranchRule<E> for OptList<Item, Sep>
where
    E: Encoding,
    Item: BranchRule<E>,
    Sep: BranchRule<E>,
{
    fn try_parse<H: Handler>(&self, ctx: &mut Context<'_, H, E>, reader: &mut Reader<'_, E>) -> Branch<Self::Output> {
        match self.0.try_parse(ctx, reader) {
            Branch::Taken(v) => Branch::Taken(v),
            Branch::Backtracked => Branch::Taken(Vec::new()),
            Branch::Failed => Branch::Failed,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::action::validate::Validate;
    use crate::context::ControlBlock;
    use crate::encoding::Byte;
    use crate::tokens::lit;

    fn run<R: BranchRule<Byte>>(rule: &R, input: &[u8]) -> ParseResult<R::Output> {
        let mut validate = Validate::new();
        let mut ctx = Context::new(&mut validate, ControlBlock::new());
        let mut reader = Reader::<Byte>::new(input);
        rule.parse(&mut ctx, &mut reader)
    }

    #[test]
    fn list_requires_at_least_one_item() {
        let rule = list(lit("x"), lit(","));
        assert!(run(&rule, b"").is_err());
    }

    #[test]
    fn list_collects_separated_items() {
        let rule = list(lit("x"), lit(","));
        let out = run(&rule, b"x,x,x").expect("three items");
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn trailing_separator_forbidden_by_default() {
        let rule = list(lit("x"), lit(","));
        assert!(run(&rule, b"x,").is_err());
    }

    #[test]
    fn trailing_separator_allowed_when_opted_in() {
        let rule = list(lit("x"), lit(",")).trailing_sep(true);
        let out = run(&rule, b"x,x,").expect("trailing comma tolerated");
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn opt_list_matches_zero_items() {
        let rule = opt_list(lit("x"), lit(","));
        let out = run(&rule, b"").expect("opt_list never fails on empty");
        assert!(out.is_empty());
    }
}
