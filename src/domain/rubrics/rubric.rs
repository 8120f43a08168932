#[derive(Debug, Clone)]
pub struct Rubric {
    pub id: i64,
    pub name: String,
    pub order: i16,
    pub super_rubric_id: Option<i64>,
}

impl Rubric {
    pub fn is_sub_rubric(&self) -> bool {
        self.super_rubric_id.is_some()
    }
}

/// A rubric that listings can be attached to, together with its parent's name.
#[derive(Debug, Clone)]
pub struct SubRubric {
    pub id: i64,
    pub name: String,
    pub order: i16,
    pub super_rubric_id: i64,
    pub super_rubric_name: String,
}

#[derive(Debug, Clone)]
pub struct SuperRubric {
    pub id: i64,
    pub name: String,
    pub order: i16,
    pub sub_rubrics: Vec<SubRubric>,
}

/// Groups rubrics into the navigation tree: super rubrics ordered by
/// (order, name), each carrying its sub rubrics in the same ordering.
/// Sub rubrics whose parent is absent from `rubrics` are dropped.
pub fn build_tree(rubrics: Vec<Rubric>) -> Vec<SuperRubric> {
    let (mut supers, subs): (Vec<Rubric>, Vec<Rubric>) =
        rubrics.into_iter().partition(|r| !r.is_sub_rubric());
    supers.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

    let mut tree: Vec<SuperRubric> = supers
        .into_iter()
        .map(|s| SuperRubric {
            id: s.id,
            name: s.name,
            order: s.order,
            sub_rubrics: Vec::new(),
        })
        .collect();

    for sub in subs {
        let Some(parent_id) = sub.super_rubric_id else {
            continue;
        };
        if let Some(parent) = tree.iter_mut().find(|p| p.id == parent_id) {
            parent.sub_rubrics.push(SubRubric {
                id: sub.id,
                name: sub.name,
                order: sub.order,
                super_rubric_id: parent_id,
                super_rubric_name: parent.name.clone(),
            });
        }
    }
    for parent in &mut tree {
        parent
            .sub_rubrics
            .sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
    }
    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rubric(id: i64, name: &str, order: i16, parent: Option<i64>) -> Rubric {
        Rubric {
            id,
            name: name.into(),
            order,
            super_rubric_id: parent,
        }
    }

    #[test]
    fn groups_sub_rubrics_under_parents_in_order() {
        let tree = build_tree(vec![
            rubric(1, "Realty", 2, None),
            rubric(2, "Transport", 1, None),
            rubric(3, "Houses", 0, Some(1)),
            rubric(4, "Cars", 5, Some(2)),
            rubric(5, "Bikes", 5, Some(2)),
            rubric(6, "Flats", 0, Some(1)),
        ]);
        let names: Vec<&str> = tree.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Transport", "Realty"]);
        let transport: Vec<&str> = tree[0].sub_rubrics.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(transport, vec!["Bikes", "Cars"]);
        let realty: Vec<&str> = tree[1].sub_rubrics.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(realty, vec!["Flats", "Houses"]);
        assert_eq!(tree[1].sub_rubrics[0].super_rubric_name, "Realty");
    }

    #[test]
    fn orphaned_sub_rubrics_are_skipped() {
        let tree = build_tree(vec![rubric(1, "Realty", 0, None), rubric(2, "Lost", 0, Some(99))]);
        assert_eq!(tree.len(), 1);
        assert!(tree[0].sub_rubrics.is_empty());
    }
}
