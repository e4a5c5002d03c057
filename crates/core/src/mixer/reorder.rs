//! Order-preserving edits of slot lists
//!
//! The same edit is applied to the configuration list and to the runtime
//! record list, so temporal state stays attached to its slot.

use crate::model::{Entity, ModelError};

fn check(len: usize, index: usize) -> Result<(), ModelError> {
    if index < len {
        Ok(())
    } else {
        Err(ModelError::IndexOutOfRange {
            entity: Entity::MixerSlot,
            index,
        })
    }
}

/// Moves the item at `old` to `new`, shifting the items in between.
pub fn move_item<T>(items: &mut [T], new: usize, old: usize) -> Result<(), ModelError> {
    check(items.len(), new)?;
    check(items.len(), old)?;
    if new < old {
        items[new..=old].rotate_right(1);
    } else if new > old {
        items[old..=new].rotate_left(1);
    }
    Ok(())
}

/// Exchanges two items.
pub fn swap_items<T>(items: &mut [T], a: usize, b: usize) -> Result<(), ModelError> {
    check(items.len(), a)?;
    check(items.len(), b)?;
    items.swap(a, b);
    Ok(())
}

/// Inserts a default item at `at`. The last item falls off.
pub fn insert_item<T: Default>(items: &mut [T], at: usize) -> Result<(), ModelError> {
    check(items.len(), at)?;
    items[at..].rotate_right(1);
    items[at] = T::default();
    Ok(())
}

/// Removes the item at `at` and appends a default item.
pub fn delete_item<T: Default>(items: &mut [T], at: usize) -> Result<(), ModelError> {
    check(items.len(), at)?;
    items[at..].rotate_left(1);
    if let Some(last) = items.last_mut() {
        *last = T::default();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_forward_and_back() {
        let mut items = [0, 1, 2, 3, 4];
        move_item(&mut items, 3, 1).unwrap();
        assert_eq!(items, [0, 2, 3, 1, 4]);
        move_item(&mut items, 0, 4).unwrap();
        assert_eq!(items, [4, 0, 2, 3, 1]);
        move_item(&mut items, 2, 2).unwrap();
        assert_eq!(items, [4, 0, 2, 3, 1]);
    }

    #[test]
    fn test_swap() {
        let mut items = [0, 1, 2];
        swap_items(&mut items, 0, 2).unwrap();
        assert_eq!(items, [2, 1, 0]);
    }

    #[test]
    fn test_insert_drops_last() {
        let mut items = [1, 2, 3, 4];
        insert_item(&mut items, 1).unwrap();
        assert_eq!(items, [1, 0, 2, 3]);
    }

    #[test]
    fn test_delete_appends_default() {
        let mut items = [1, 2, 3, 4];
        delete_item(&mut items, 1).unwrap();
        assert_eq!(items, [1, 3, 4, 0]);
    }

    #[test]
    fn test_out_of_range_leaves_items() {
        let mut items = [1, 2, 3];
        assert_eq!(
            move_item(&mut items, 3, 0),
            Err(ModelError::IndexOutOfRange {
                entity: Entity::MixerSlot,
                index: 3
            })
        );
        assert!(delete_item(&mut items, 7).is_err());
        assert_eq!(items, [1, 2, 3]);
    }
}
