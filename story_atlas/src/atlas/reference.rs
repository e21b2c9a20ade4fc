//! The reference documentary shipped with the crate: "Horizons Suspendus",
//! a journey through the eco-anxiety of the 18-25 generation.

use crate::chapters::{Chapter, ChapterMedia, Chapters};
use crate::constellation::{Constellation, Link, Node, NodeId};
use crate::rules::{ConvergenceRule, UnlockRules};

use super::StoryAtlas;

// Validity is covered by tests; the fields are built directly so loading the
// built-in content stays infallible.
pub(super) fn horizons() -> StoryAtlas {
    StoryAtlas {
        constellation: constellation(),
        chapters: chapters(),
        rules: rules(),
        start: NodeId::new("les-racines"),
        terminal: NodeId::new("message-de-fin"),
    }
}

fn constellation() -> Constellation {
    let nodes = vec![
        Node::new("les-racines", "Les Racines")
            .with_size(20.0)
            .with_position(-150.0, 10.0),
        Node::new("le-vertige", "Le Vertige")
            .with_size(20.0)
            .with_position(-50.0, -50.0),
        Node::new("la-boussole", "La Boussole")
            .with_size(20.0)
            .with_position(20.0, 20.0),
        Node::new("poids-monde", "Le Poids du Monde")
            .with_size(20.0)
            .with_position(50.0, -80.0),
        Node::new("nouveaux-horizons", "Nouveaux Horizons")
            .with_size(20.0)
            .with_position(120.0, -30.0),
        Node::new("message-de-fin", "Merci !")
            .with_size(25.0)
            .with_position(180.0, 0.0),
        // Background stars.
        Node::new("star1", "").with_size(2.0).with_position(-180.0, -90.0).decorative(),
        Node::new("star2", "").with_size(2.0).with_position(0.0, -110.0).decorative(),
        Node::new("star3", "").with_size(2.0).with_position(80.0, 60.0).decorative(),
        Node::new("star4", "").with_size(2.0).with_position(150.0, 40.0).decorative(),
    ];

    let links = vec![
        Link::new("les-racines", "le-vertige"),
        Link::new("le-vertige", "la-boussole"),
        Link::new("le-vertige", "poids-monde"),
        Link::new("la-boussole", "nouveaux-horizons"),
        Link::new("poids-monde", "nouveaux-horizons"),
        Link::new("nouveaux-horizons", "message-de-fin"),
        // Decorative ties.
        Link::new("star1", "le-vertige"),
        Link::new("star2", "poids-monde"),
        Link::new("star3", "la-boussole"),
        Link::new("star4", "nouveaux-horizons"),
    ];

    Constellation::new(nodes, links)
}

fn rules() -> UnlockRules {
    let mut rules = UnlockRules::new();

    rules.add_direct("les-racines", vec![NodeId::new("le-vertige")]);
    rules.add_direct(
        "le-vertige",
        vec![NodeId::new("la-boussole"), NodeId::new("poids-monde")],
    );
    rules.add_direct("nouveaux-horizons", vec![NodeId::new("message-de-fin")]);

    // The diamond: both middle branches must be visited before the horizon
    // opens.
    rules.add_convergence(ConvergenceRule::new(
        vec![NodeId::new("la-boussole"), NodeId::new("poids-monde")],
        "nouveaux-horizons",
    ));

    rules
}

fn chapters() -> Chapters {
    let mut chapters = Chapters::new();

    chapters.insert(
        "les-racines",
        Chapter::new("LES RACINES")
            .with_body(vec![
                "\"Avant, l'horizon était une ligne droite. On nous disait que le monde nous appartenait. Aujourd'hui, cette ligne tremble. Les racines sont là, mais le sol, lui, semble se dérober.\"",
                "L'adolescence est le moment où la construction de soi percute la réalité du monde. C'est ici que naît la première fracture : celle entre la sécurité du foyer et le vertige d'un futur que l'on ne maîtrise plus.",
                "Comment projeter son propre avenir quand l'éco-anxiété devient le nouveau bruit de fond de nos vies ?",
            ])
            .with_media(ChapterMedia {
                image: Some("/images/noeuds/racine.jpg".to_string()),
                voiceover: Some("/audio/vo/racine-voiceover.mp3".to_string()),
                background_audio: Some("/audio/vo/racine-background.mp3".to_string()),
                ..Default::default()
            }),
    );

    chapters.insert(
        "le-vertige",
        Chapter::new("LE VERTIGE")
            .with_body(vec![
                "Le smartphone n'est plus un simple outil de communication : pour la génération 18-25 ans, il est devenu une fenêtre béante sur l'effondrement global.",
                "Dans l'obscurité d'une chambre, la lumière bleue ne se contente pas d'éclairer un visage ; elle diffuse un flux continu d'alertes qui saturent l'esprit.",
                "Ce \"scroll\" infini n'est pas une simple passivité. C'est une confrontation brutale avec l'éco-anxiété.",
                "L'alerte permanente : chaque titre sur le dérèglement climatique ou l'extinction des espèces agit comme une micro-agression cognitive, renforçant ce sentiment d'être \"suspendu\" face à un futur incertain.",
                "Le paradoxe de l'information : être la génération la plus connectée de l'histoire signifie porter la charge mentale d'un monde en crise, tout en étant physiquement seul face à son écran.",
                "La saturation : ce vertige est le point de bascule où le trop-plein d'informations paralyse l'action.",
                "On devient, malgré soi, le spectateur impuissant d'un désastre que l'on nous demande pourtant de réparer. « L'incertitude est le moteur d'une nouvelle forme d'engagement, mais elle commence souvent par ce silence lourd devant la lumière froide des écrans. »",
            ])
            .with_media(ChapterMedia {
                video: Some("/video/vertige.mp4".to_string()),
                ..Default::default()
            }),
    );

    chapters.insert(
        "la-boussole",
        Chapter::new("LA BOUSSOLE")
            .with_body(vec![
                "\"Je suis engagée depuis plus de trois ans dans le mouvement écologiste. L'écoanxiété est arrivée avec. J'en souffre régulièrement. L'état dans lequel nous laissons entrevoir notre futur n'est pas acceptable. Il m'arrive parfois de me dire que se battre ne sert plus à rien, qu'il faut abandonner et arrêter de donner de l'énergie pour un combat déjà perdu.",
                "Ce sentiment me poursuit au quotidien, dans tous les aspects de ma vie. J'ai changé mon alimentation et ma façon de voir les choses. Je ne souhaite pas avoir d'enfant, je ne veux pas laisser quelqu'un vivre dans le monde que nous sommes en train de bâtir. J'essaye pourtant de garder de l'espoir.",
                "Si l'écoanxiété touche tous les militants écologistes un jour ou l'autre, nous nous remotivons toujours et continuons le combat.\"",
                "Marina, 19 ans",
            ])
            .with_media(ChapterMedia {
                image: Some("/images/noeuds/boussole.jpg".to_string()),
                background_audio: Some("/audio/vo/boussole-background.mp3".to_string()),
                ..Default::default()
            }),
    );

    chapters.insert(
        "poids-monde",
        Chapter::new("LE POIDS DU MONDE")
            .with_body(vec![
                "1. Le poids écologique, l'avenir suspendu : en 2025, 32 % des 15-24 ans en France sont considérés comme éco-anxieux, de symptômes modérés à sévères.",
                "75 % des jeunes jugent le futur \"effrayant\" à cause de la crise climatique, et cette génération s'inquiète plus que les précédentes de l'impact de ses propres comportements sur l'environnement.",
                "2. Le poids académique et social : 59 % des adolescents et étudiants se disent angoissés par les notes et les examens. Un jeune sur deux pense souvent qu'il va échouer à un examen ou à un entretien.",
                "62 % des 11-24 ans craignent l'échec global et 56 % ont peur de se tromper de voie.",
                "3. Le poids de la précarité : en 2024, 27 % des étudiants vivent avec moins de 50 euros de reste à vivre par mois après paiement des charges fixes.",
                "18 % des étudiants ont déjà eu recours à l'aide alimentaire, un sur deux a déjà sauté un repas par manque d'argent, et 41 % déclarent se sentir seuls.",
                "4. La santé mentale : 55 % des 18-24 ans ont déjà été affectés par un problème de santé mentale. Chez les jeunes femmes de 11 à 24 ans, 32 % ressentent l'envie de \"tout abandonner\" face à la pression sociétale.",
                "Sources : The Lancet Planetary Health (Hickman et al., 2021) ; rapport ADEME sur l'éco-anxiété en France (avril 2025) ; enquêtes Linkee \"Avoir 20 ans en 2024/2025\" ; baromètre des adolescents Ipsos (2024) ; Odoxa / Mutualité Française (septembre 2024) ; Santé publique France (baromètre 2024/2025).",
            ])
            .with_media(ChapterMedia {
                embed: Some(
                    "<iframe src=\"https://embed.kumu.io/1830091f2b16762285f2d0a937c672a3\" width=\"899\" height=\"490\" frameborder=\"0\"></iframe>"
                        .to_string(),
                ),
                ..Default::default()
            }),
    );

    chapters.insert(
        "nouveaux-horizons",
        Chapter::new("L'ÉVEIL")
            .with_body(vec![
                "\"Le futur n'est pas écrit. Il est dans chaque pas, chaque refus, chaque main tendue. On ne répare pas le monde tout seul, on le réinvente ensemble.\"",
                "L'horizon n'est plus suspendu. Il est simplement à redessiner.",
                "Nous avons exploré le vertige, ressenti le poids des chiffres et navigué dans le brouillard de l'incertitude.",
                "Mais au bout de ce voyage, une certitude demeure : l'impuissance est une illusion entretenue par l'isolement.",
                "L'éco-anxiété n'est pas une maladie à guérir, c'est le signal d'alarme d'une humanité qui refuse de s'éteindre.",
                "En reposant nos écrans, en retrouvant le contact de la terre et le regard de l'autre, la paralysie s'efface.",
                "L'action collective devient l'antidote au désespoir. Nous ne sommes plus les spectateurs d'une fin du monde, mais les architectes d'un monde qui commence.",
                "Un monde plus lent, plus juste, plus vivant. L'horizon ne nous attend pas, il nous appelle.",
                "Il est temps de sortir de la suspension.",
            ])
            .with_media(ChapterMedia {
                image: Some("/images/noeuds/horizon.jpg".to_string()),
                voiceover: Some("/audio/vo/horizon-voiceover.mp3".to_string()),
                background_audio: Some("/audio/vo/horizon-background.mp3".to_string()),
                ..Default::default()
            }),
    );

    chapters.insert(
        "message-de-fin",
        Chapter::new("MERCI !").with_body(vec![
            "Merci d'avoir exploré ce voyage avec nous. L'histoire continue avec vous.",
        ]),
    );

    chapters
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bundled_atlas_validates() {
        let atlas = StoryAtlas::bundled();
        assert!(atlas.validate().is_ok());
    }

    #[test]
    fn test_bundled_shape() {
        let atlas = StoryAtlas::bundled();

        assert_eq!(atlas.start().as_str(), "les-racines");
        assert_eq!(atlas.terminal().as_str(), "message-de-fin");
        assert_eq!(atlas.constellation().nodes().len(), 10);
        assert_eq!(atlas.constellation().links().len(), 10);
        assert_eq!(atlas.chapters().len(), 6);

        let decorative = atlas
            .constellation()
            .nodes()
            .iter()
            .filter(|node| node.decorative)
            .count();
        assert_eq!(decorative, 4);
    }

    #[test]
    fn test_bundled_diamond_rule() {
        let atlas = StoryAtlas::bundled();
        let rules = atlas.rules();

        assert_eq!(rules.direct_unlocks("les-racines").len(), 1);
        assert_eq!(rules.direct_unlocks("le-vertige").len(), 2);

        let convergences = rules.convergences();
        assert_eq!(convergences.len(), 1);
        assert_eq!(convergences[0].unlocks.as_str(), "nouveaux-horizons");

        let requires: HashSet<&str> = convergences[0]
            .requires
            .iter()
            .map(|id| id.as_str())
            .collect();
        assert_eq!(requires, HashSet::from(["la-boussole", "poids-monde"]));
    }

    #[test]
    fn test_bundled_chapters_have_content() {
        let atlas = StoryAtlas::bundled();

        let vertige = atlas.chapter("le-vertige").unwrap();
        assert_eq!(vertige.title, "LE VERTIGE");
        assert!(!vertige.body.is_empty());
        assert!(vertige.media.video.is_some());

        // Decorative stars have no chapter behind them.
        assert!(atlas.chapter("star1").is_none());
    }
}
