use std::slice;

use crate::rect::FaceRect;

/// Running largest-by-area face over a face set.
///
/// Yields one item per input face: the largest among every face seen so
/// far. A later face only takes over when strictly larger, so the first of
/// equally large faces wins.
#[derive(Clone, Debug)]
pub struct PrefixMaxima<'a> {
    faces: slice::Iter<'a, FaceRect>,
    biggest: Option<FaceRect>,
}

impl Iterator for PrefixMaxima<'_> {
    type Item = FaceRect;

    fn next(&mut self) -> Option<FaceRect> {
        let current = *self.faces.next()?;
        let biggest = match self.biggest {
            Some(biggest) if current.area() <= biggest.area() => biggest,
            _ => current,
        };
        self.biggest = Some(biggest);
        Some(biggest)
    }

    fn size_hint(&self) -> (usize, Option<usize>) { self.faces.size_hint() }
}

impl ExactSizeIterator for PrefixMaxima<'_> {}

pub fn prefix_maxima(faces: &[FaceRect]) -> PrefixMaxima<'_> {
    PrefixMaxima {
        faces: faces.iter(),
        biggest: None,
    }
}

/// The largest face and its position in `faces`, first one on ties.
pub fn largest(faces: &[FaceRect]) -> Option<(usize, FaceRect)> {
    let mut best: Option<(usize, FaceRect)> = None;
    for (i, face) in faces.iter().enumerate() {
        match best {
            Some((_, b)) if face.area() <= b.area() => {},
            _ => best = Some((i, *face)),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn square(x: i32, side: u32) -> FaceRect { FaceRect::new(x, 0, side, side) }

    #[test]
    fn empty_set_yields_nothing() {
        assert_eq!(prefix_maxima(&[]).count(), 0);
        assert_eq!(largest(&[]), None);
    }

    #[test]
    fn increasing_sizes_follow_each_face() {
        let faces = [square(0, 40), square(50, 60)];
        let maxima: Vec<_> = prefix_maxima(&faces).collect();
        assert_eq!(maxima, vec![faces[0], faces[1]]);
        assert_eq!(largest(&faces), Some((1, faces[1])));
    }

    #[test]
    fn decreasing_sizes_keep_the_first() {
        let faces = [square(0, 60), square(70, 40), square(120, 50)];
        let maxima: Vec<_> = prefix_maxima(&faces).collect();
        assert_eq!(maxima, vec![faces[0]; 3]);
        assert_eq!(largest(&faces), Some((0, faces[0])));
    }

    #[test]
    fn ties_go_to_the_first_seen() {
        let faces = [square(0, 40), FaceRect::new(100, 0, 20, 80), square(200, 40)];
        let maxima: Vec<_> = prefix_maxima(&faces).collect();
        assert_eq!(maxima, vec![faces[0]; 3]);
        assert_eq!(largest(&faces), Some((0, faces[0])));
    }

    #[test]
    fn last_prefix_maximum_is_the_largest() {
        let faces = [square(0, 30), square(0, 90), square(0, 20), square(0, 91)];
        assert_eq!(prefix_maxima(&faces).len(), 4);
        assert_eq!(
            prefix_maxima(&faces).last(),
            largest(&faces).map(|(_, face)| face)
        );
    }
}
