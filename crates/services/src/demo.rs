// Demo squads for local runs and tests

use knockout_models::{Player, Position, Team};

const SQUADS: [(&str, &str, u8, [&str; 5]); 8] = [
    ("Nigeria", "Eric Chelle", 82, ["Stanley Nwabali", "William Troost-Ekong", "Wilfred Ndidi", "Ademola Lookman", "Victor Osimhen"]),
    ("Egypt", "Hossam Hassan", 80, ["Mohamed El Shenawy", "Mohamed Abdelmonem", "Emam Ashour", "Omar Marmoush", "Mohamed Salah"]),
    ("Senegal", "Pape Thiaw", 84, ["Edouard Mendy", "Kalidou Koulibaly", "Idrissa Gueye", "Ismaila Sarr", "Sadio Mane"]),
    ("Morocco", "Walid Regragui", 86, ["Yassine Bounou", "Achraf Hakimi", "Sofyan Amrabat", "Brahim Diaz", "Youssef En-Nesyri"]),
    ("Ghana", "Otto Addo", 74, ["Lawrence Ati-Zigi", "Mohammed Salisu", "Thomas Partey", "Mohammed Kudus", "Jordan Ayew"]),
    ("Cameroon", "Marc Brys", 76, ["Andre Onana", "Jean-Charles Castelletto", "Andre-Frank Zambo Anguissa", "Bryan Mbeumo", "Vincent Aboubakar"]),
    ("Algeria", "Vladimir Petkovic", 78, ["Anthony Mandrea", "Aissa Mandi", "Ismael Bennacer", "Riyad Mahrez", "Baghdad Bounedjah"]),
    ("Ivory Coast", "Emerse Fae", 81, ["Yahia Fofana", "Odilon Kossounou", "Franck Kessie", "Simon Adingra", "Sebastien Haller"]),
];

const LINEUP: [(Position, u8); 5] = [
    (Position::Goalkeeper, 78),
    (Position::Defender, 76),
    (Position::Midfielder, 79),
    (Position::Attacker, 80),
    (Position::Attacker, 83),
];

/// Eight registrable squads; the striker captains each side.
pub fn demo_teams() -> Vec<Team> {
    SQUADS
        .iter()
        .map(|(country, manager, rating, names)| {
            let players = names
                .iter()
                .zip(LINEUP)
                .enumerate()
                .map(|(index, (name, (position, skill)))| {
                    let player = Player::new(*name, position, skill);
                    if index == names.len() - 1 {
                        player.as_captain()
                    } else {
                        player
                    }
                })
                .collect();
            Team::new(*country, *manager, *rating, players)
        })
        .collect()
}
